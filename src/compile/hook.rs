use crate::{compile::context::CompilationContext, foundation::error::MenuGraphResult};

/// Extension point run once per generation, after the built-in passes and before commit.
///
/// Hooks may acquire parameters (keeping them alive through pruning), stage extra layers and
/// record warnings. An error fails the whole run.
pub trait GeneratorHook {
    fn name(&self) -> &str;

    fn after_passes(&mut self, ctx: &mut CompilationContext<'_>) -> MenuGraphResult<()>;
}
