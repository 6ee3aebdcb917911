/// Named-placeholder convention consumed by a driver.
///
/// Builders and the session emit bound-parameter fragments in the style the
/// session's driver reports, so the same builder code serves drivers with
/// `:name`, `@name`, or `$name` syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `:name` placeholders (`SQLite`, Oracle-style drivers).
    Colon,
    /// `@name` placeholders (SQL Server-style drivers).
    AtSign,
    /// `$name` placeholders.
    Dollar,
}

impl PlaceholderStyle {
    #[must_use]
    pub fn prefix(self) -> char {
        match self {
            PlaceholderStyle::Colon => ':',
            PlaceholderStyle::AtSign => '@',
            PlaceholderStyle::Dollar => '$',
        }
    }

    /// Render the placeholder for a bound field, e.g. `:status`.
    #[must_use]
    pub fn fragment(self, field: &str) -> String {
        format!("{}{field}", self.prefix())
    }
}
