use crate::driver::TxId;

/// Options controlling how a row is persisted.
///
/// Every option is optional so that a caller's options can be laid over a set
/// of defaults with [`SaveOptions::or`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SaveOptions {
    /// Restrict the write to these attributes. All attributes when unset.
    pub fields: Option<Vec<String>>,

    /// Attributes allowed to be `NULL` for this save, whatever their declared
    /// nullability.
    pub allow_null: Option<Vec<String>>,

    /// Whether model hooks should run for this save.
    pub hooks: Option<bool>,

    /// Transaction the write runs in.
    pub transaction: Option<TxId>,
}

impl SaveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn allow_null<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow_null = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn hooks(mut self, hooks: bool) -> Self {
        self.hooks = Some(hooks);
        self
    }

    pub fn transaction(mut self, transaction: impl Into<TxId>) -> Self {
        self.transaction = Some(transaction.into());
        self
    }

    /// Fills every option left unset in `self` from `defaults`.
    pub fn or(self, defaults: SaveOptions) -> SaveOptions {
        SaveOptions {
            fields: self.fields.or(defaults.fields),
            allow_null: self.allow_null.or(defaults.allow_null),
            hooks: self.hooks.or(defaults.hooks),
            transaction: self.transaction.or(defaults.transaction),
        }
    }

    pub fn allows_null(&self, name: &str) -> bool {
        self.allow_null
            .as_ref()
            .is_some_and(|names| names.iter().any(|allowed| allowed == name))
    }
}
