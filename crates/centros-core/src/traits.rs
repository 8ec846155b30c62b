// crates/centros-core/src/traits.rs
use crate::text::fold_key;

/// Name-based matching helpers for types that expose a canonical display name.
///
/// This trait centralizes Unicode‑aware, accent-insensitive and case-insensitive
/// comparisons based on [`fold_key`]. Implementors provide a `&str` view of
/// their canonical name via [`NameMatch::name_str`], and get convenient helpers:
/// - [`NameMatch::is_named`]: equality on folded form
/// - [`NameMatch::name_contains`]: substring match on folded form
/// - [`NameMatch::name_position`]: byte offset of the first folded match
///
/// # Examples
/// ```rust
/// use centros_core::traits::NameMatch;
///
/// struct Place(&'static str);
/// impl NameMatch for Place {
///     fn name_str(&self) -> &str { self.0 }
/// }
///
/// assert!(Place("Pérez Zeledón").is_named("perez zeledon"));
/// assert!(Place("Liceo de Alajuelita").name_contains("ALAJUELITA"));
/// assert_eq!(Place("Escuela Líder").name_position("lider"), Some(8));
/// ```
pub trait NameMatch {
    /// Returns the canonical display name used for matching.
    fn name_str(&self) -> &str;

    /// Accent-insensitive and case-insensitive name comparison.
    #[inline]
    fn is_named(&self, q: &str) -> bool {
        fold_key(self.name_str()) == fold_key(q)
    }

    /// Accent-insensitive + case-insensitive substring match.
    #[inline]
    fn name_contains(&self, q: &str) -> bool {
        self.name_position(q).is_some()
    }

    /// Position of the folded query inside the folded name.
    ///
    /// Returns `None` for an empty query or when there is no match.
    fn name_position(&self, q: &str) -> Option<usize> {
        let q = fold_key(q);
        if q.is_empty() {
            return None;
        }
        fold_key(self.name_str()).find(&q)
    }
}
