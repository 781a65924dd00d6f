//! Generation options.

/// Options affecting the generated code, one per CLI flag.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Don't generate the record declaration (struct + `Default` impl).
    pub no_class: bool,
    /// Don't generate the decode routine.
    pub no_decoder: bool,
    /// Don't generate the encode routine.
    pub no_encoder: bool,
    /// Omit the `has_*` presence flags. Implies `no_required`.
    pub no_has_fields: bool,
    /// Ignore the `required` attribute (no post-decode presence guards).
    pub no_required: bool,
    /// Ignore schema default value literals.
    pub no_default_values: bool,
    /// Pack every repeated field that the wire format allows to be packed.
    pub packed: bool,
    /// Never pack repeated fields.
    pub no_packed: bool,
    /// Record type for `string`/`bytes` fields. When unset, `string` fields
    /// use `String` and `bytes` fields use `Vec<u8>`.
    pub string_type: Option<String>,
    /// Container type for repeated fields. Defaults to `Vec`.
    pub repeated_type: Option<String>,
}

impl Options {
    /// Required-field guards need the presence flags to exist.
    pub(crate) fn effective_no_required(&self) -> bool {
        self.no_required || self.no_has_fields
    }

    pub(crate) fn string_field_type(&self) -> &str {
        self.string_type.as_deref().unwrap_or("String")
    }

    pub(crate) fn bytes_field_type(&self) -> &str {
        self.string_type.as_deref().unwrap_or("Vec<u8>")
    }

    pub(crate) fn repeated_container(&self) -> &str {
        self.repeated_type.as_deref().unwrap_or("Vec")
    }
}
