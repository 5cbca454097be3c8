// Copyright (c) the jpeg_baseline Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::collections::VecDeque;

use num_derive::FromPrimitive;

use crate::bit_reader::BitStream;
use crate::error::{HuffmanError, Result};

pub const HUFFMAN_MAX_BITS: usize = 16;
pub const NUM_TABLE_IDS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum TableClass {
    Dc = 0,
    Ac = 1,
}

#[derive(Debug, Default, Clone)]
struct Node {
    children: [Option<usize>; 2],
    value: Option<u8>,
}

/// Canonical Huffman decode tree stored as a flat arena, the root at index 0.
///
/// Decoding is stateful: [`HuffmanTree::decode_bit`] advances a cursor by
/// exactly one bit, so a symbol may be fed in over any number of calls.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    cursor: usize,
}

impl Default for HuffmanTree {
    fn default() -> Self {
        Self::new()
    }
}

impl HuffmanTree {
    /// A tree with no codes; every decode attempt fails.
    pub fn new() -> HuffmanTree {
        HuffmanTree {
            nodes: vec![Node::default()],
            cursor: 0,
        }
    }

    /// Builds the tree from the number of codes of each length (1 to 16 bits)
    /// and the symbols in code order.
    ///
    /// Nodes are visited breadth first, left before right. A node at depth
    /// `d` becomes a leaf while codes of length `d` remain to be assigned,
    /// otherwise it gets two children if any longer code is still declared.
    pub fn build(code_lengths: &[u8], values: &[u8]) -> Result<HuffmanTree> {
        if code_lengths.len() > HUFFMAN_MAX_BITS {
            return Err(HuffmanError::TooManyLengths(code_lengths.len()).into());
        }
        let max_depth = code_lengths
            .iter()
            .rposition(|&count| count != 0)
            .map_or(0, |i| i + 1);

        let mut tree = HuffmanTree::new();
        let mut assigned = [0u8; HUFFMAN_MAX_BITS];
        let mut next_value = values.iter();
        let mut queue = VecDeque::from([(0usize, 0usize)]);

        while let Some((node, depth)) = queue.pop_front() {
            if depth > 0 && assigned[depth - 1] < code_lengths[depth - 1] {
                let value = *next_value
                    .next()
                    .ok_or(HuffmanError::ValuesExhausted(depth))?;
                tree.nodes[node].value = Some(value);
                assigned[depth - 1] += 1;
                continue;
            }
            if depth + 1 > max_depth {
                continue;
            }
            for side in 0..2 {
                let child = tree.nodes.len();
                tree.nodes.push(Node::default());
                tree.nodes[node].children[side] = Some(child);
                queue.push_back((child, depth + 1));
            }
        }

        if let Some(depth) = code_lengths
            .iter()
            .zip(assigned.iter())
            .position(|(want, got)| got < want)
        {
            return Err(HuffmanError::Unsatisfied(depth + 1).into());
        }
        Ok(tree)
    }

    /// Moves one step down the tree. Returns the symbol when a leaf is reached,
    /// after which the next call starts again from the root.
    pub fn decode_bit(&mut self, bit: bool) -> Result<Option<u8>> {
        let child = self.nodes[self.cursor].children[bit as usize];
        let Some(child) = child else {
            self.cursor = 0;
            return Err(HuffmanError::InvalidCode.into());
        };
        match self.nodes[child].value {
            Some(value) => {
                self.cursor = 0;
                Ok(Some(value))
            }
            None => {
                self.cursor = child;
                Ok(None)
            }
        }
    }

    /// Reads bits until a complete symbol has been decoded.
    pub fn read_symbol(&mut self, bits: &mut BitStream) -> Result<u8> {
        loop {
            if let Some(value) = self.decode_bit(bits.next_bit()?)? {
                return Ok(value);
            }
        }
    }

    /// Every symbol with the path that reaches it, in depth-first order.
    #[cfg(test)]
    pub(crate) fn code_paths(&self) -> Vec<(u8, Vec<bool>)> {
        let mut out = vec![];
        let mut stack = vec![(0usize, vec![])];
        while let Some((node, path)) = stack.pop() {
            if let Some(value) = self.nodes[node].value {
                out.push((value, path));
                continue;
            }
            for (side, child) in self.nodes[node].children.iter().enumerate() {
                if let Some(child) = child {
                    let mut child_path = path.clone();
                    child_path.push(side == 1);
                    stack.push((*child, child_path));
                }
            }
        }
        out
    }
}

/// Decode trees for both table classes and all four destination ids.
#[derive(Debug)]
pub struct HuffmanTables {
    dc: [Option<HuffmanTree>; NUM_TABLE_IDS],
    ac: [Option<HuffmanTree>; NUM_TABLE_IDS],
}

impl Default for HuffmanTables {
    fn default() -> Self {
        Self::new()
    }
}

impl HuffmanTables {
    pub fn new() -> HuffmanTables {
        HuffmanTables {
            dc: array_init::array_init(|_| None),
            ac: array_init::array_init(|_| None),
        }
    }

    fn slot(&mut self, class: TableClass) -> &mut [Option<HuffmanTree>; NUM_TABLE_IDS] {
        match class {
            TableClass::Dc => &mut self.dc,
            TableClass::Ac => &mut self.ac,
        }
    }

    /// Stores `tree`, replacing any table previously defined for `(class, id)`.
    pub fn set(&mut self, class: TableClass, id: u8, tree: HuffmanTree) -> Result<()> {
        let entry = self
            .slot(class)
            .get_mut(id as usize)
            .ok_or(HuffmanError::InvalidId(id))?;
        *entry = Some(tree);
        Ok(())
    }

    pub fn get_mut(&mut self, class: TableClass, id: u8) -> Result<&mut HuffmanTree> {
        self.slot(class)
            .get_mut(id as usize)
            .and_then(Option::as_mut)
            .ok_or_else(|| HuffmanError::Undefined { class, id }.into())
    }
}
