//! Build context - toolchain and host platform for one generation run.

use std::fmt;
use std::sync::Arc;

use crate::builder::toolchain::{toolchain_for, Toolchain};
use crate::core::options::Compiler;
use crate::core::platform::Platform;

/// Build context containing toolchain and platform information.
#[derive(Clone)]
pub struct BuildContext {
    /// Toolchain implementation
    pub toolchain: Arc<dyn Toolchain>,

    /// Platform the build runs on
    pub platform: Platform,
}

impl fmt::Debug for BuildContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildContext")
            .field("toolchain", &self.toolchain.compiler())
            .field("platform", &self.platform)
            .finish()
    }
}

impl BuildContext {
    /// Create a context for `compiler` on `platform`.
    pub fn new(compiler: Compiler, platform: Platform) -> Self {
        BuildContext {
            toolchain: Arc::from(toolchain_for(compiler)),
            platform,
        }
    }

    /// Create a context for `compiler` on the host platform.
    pub fn host(compiler: Compiler) -> Self {
        Self::new(compiler, Platform::host())
    }
}
