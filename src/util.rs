// Copyright (c) the jpeg_baseline Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.


/// Logging macros that compile to nothing unless the `tracing` feature is enabled.
#[cfg(feature = "tracing")]
pub mod tracing_wrappers {
    #[allow(unused_imports)]
    pub(crate) use tracing::{debug, trace, warn};
}

#[cfg(not(feature = "tracing"))]
pub mod tracing_wrappers {
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }
    // `warn` itself would clash with the built-in lint attribute.
    macro_rules! no_warn {
        ($($arg:tt)*) => {};
    }
    #[allow(unused_imports)]
    pub(crate) use {debug, no_warn as warn, trace};
}
