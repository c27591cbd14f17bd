//! Company membership: tokenizing the `Company` cell and resolving display
//! colors.
//!
//! A cell may name several companies separated by `,` or `;`. Zero tokens,
//! one token and several tokens resolve differently:
//!
//! | tokens | result                                          |
//! |--------|-------------------------------------------------|
//! | 0      | `Solid(no_company)`                             |
//! | 1      | `Solid(color)`, or `Solid(unknown)`             |
//! | 2+     | `Blend([...])`, one color per token, in order   |

pub mod color;

pub use color::{parse_hex_color, Rgba};

fn is_separator(c: char) -> bool {
    c == ',' || c == ';'
}

/// Split a company cell into trimmed tokens.
///
/// A blank cell has no tokens at all. Otherwise every separator counts, so
/// `"УК,"` yields `["УК", ""]` and the empty token later resolves to the
/// unknown color.
pub fn tokens(field: &str) -> impl Iterator<Item = &str> {
    let blank = field.trim().is_empty();
    field
        .split(is_separator)
        .map(str::trim)
        .take_while(move |_| !blank)
}

pub fn company_tokens(field: Option<&str>) -> Vec<&str> {
    field.map(|f| tokens(f).collect()).unwrap_or_default()
}

/// Exact, case-sensitive token membership.
pub fn has_token(field: Option<&str>, token: &str) -> bool {
    field.is_some_and(|f| tokens(f).any(|t| t == token))
}

/// Resolved fill for one card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompanyColor {
    Solid(Rgba),
    /// Multi-company membership; colors follow token order.
    Blend(Vec<Rgba>),
}

impl CompanyColor {
    /// The ordered color stops (a single stop for `Solid`).
    pub fn stops(&self) -> &[Rgba] {
        match self {
            CompanyColor::Solid(c) => std::slice::from_ref(c),
            CompanyColor::Blend(colors) => colors,
        }
    }

    pub fn is_blend(&self) -> bool {
        matches!(self, CompanyColor::Blend(_))
    }
}

/// Token → color table plus the two fallbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyPalette {
    entries: Vec<(String, Rgba)>,
    no_company: Rgba,
    unknown: Rgba,
}

impl Default for CompanyPalette {
    fn default() -> Self {
        Self::new(Rgba::WHITE, Rgba::rgb(0xcc, 0xcc, 0xcc))
            .with_company("УК", Rgba::rgb(0xe0, 0xf2, 0xff))
            .with_company("ДК", Rgba::rgb(0xe6, 0xfc, 0xe6))
            .with_company("РТ", Rgba::rgb(0xff, 0xf9, 0xdb))
    }
}

impl CompanyPalette {
    /// An empty palette with the given fallbacks.
    pub fn new(no_company: Rgba, unknown: Rgba) -> Self {
        Self {
            entries: Vec::new(),
            no_company,
            unknown,
        }
    }

    /// Add or recolor a company. New tokens keep insertion order.
    pub fn with_company(mut self, token: impl Into<String>, color: Rgba) -> Self {
        let token = token.into();
        match self.entries.iter_mut().find(|(t, _)| *t == token) {
            Some(entry) => entry.1 = color,
            None => self.entries.push((token, color)),
        }
        self
    }

    pub fn with_no_company(mut self, color: Rgba) -> Self {
        self.no_company = color;
        self
    }

    pub fn with_unknown(mut self, color: Rgba) -> Self {
        self.unknown = color;
        self
    }

    pub fn entries(&self) -> &[(String, Rgba)] {
        &self.entries
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(t, _)| t.as_str())
    }

    pub fn no_company(&self) -> Rgba {
        self.no_company
    }

    pub fn unknown(&self) -> Rgba {
        self.unknown
    }

    pub fn color_of(&self, token: &str) -> Option<Rgba> {
        self.entries
            .iter()
            .find(|(t, _)| t == token)
            .map(|&(_, c)| c)
    }

    /// Resolve a single token, falling back to the unknown color.
    pub fn resolve_token(&self, token: &str) -> Rgba {
        self.color_of(token).unwrap_or(self.unknown)
    }

    /// Resolve a whole `Company` cell.
    pub fn resolve(&self, field: Option<&str>) -> CompanyColor {
        let tokens = company_tokens(field);
        match tokens.as_slice() {
            [] => CompanyColor::Solid(self.no_company),
            [single] => CompanyColor::Solid(self.resolve_token(single)),
            many => CompanyColor::Blend(many.iter().map(|t| self.resolve_token(t)).collect()),
        }
    }
}
