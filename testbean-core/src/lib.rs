/// Represents how a bean override is applied to the context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BeanOverrideStrategy {
    /// Replace an existing provider.
    ///
    /// Fails if there is no provider to replace.
    ReplaceDefinition,
    /// Replace an existing provider, or create one if it does not exist.
    ReplaceOrCreateDefinition,
}

impl BeanOverrideStrategy {
    /// Returns the name of the variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            BeanOverrideStrategy::ReplaceDefinition => "ReplaceDefinition",
            BeanOverrideStrategy::ReplaceOrCreateDefinition => "ReplaceOrCreateDefinition",
        }
    }

    /// Returns whether a missing provider may be created instead of replaced.
    pub fn allows_create(&self) -> bool {
        matches!(self, BeanOverrideStrategy::ReplaceOrCreateDefinition)
    }
}
