//! Department name normalization for the geo-join.
//!
//! The same deterministic pipeline is applied to patient rows at load time
//! and to boundary features at load time. This ensures that "Bogota",
//! "bogotá" and "BOGOTÁ " all produce the same join key.

/// Normalizes a department name into its join key.
///
/// The pipeline:
/// 1. Uppercase
/// 2. Fold Latin diacritics (`Á` → `A`, `Ñ` → `N`, ...)
/// 3. Collapse whitespace
/// 4. Trim
#[must_use]
pub fn department_key(input: &str) -> String {
    let folded: String = input.to_uppercase().chars().map(fold_diacritic).collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Maps an uppercase accented Latin letter to its unaccented base letter.
///
/// Characters outside the table pass through unchanged.
const fn fold_diacritic(c: char) -> char {
    match c {
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'Ç' => 'C',
        'È' | 'É' | 'Ê' | 'Ë' => 'E',
        'Ì' | 'Í' | 'Î' | 'Ï' => 'I',
        'Ñ' => 'N',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'Ù' | 'Ú' | 'Û' | 'Ü' => 'U',
        'Ý' => 'Y',
        _ => c,
    }
}
