//! Small formatting helpers shared by the display impls.

/// Renders a finitely generated abelian group from its free rank and
/// invariant factors, e.g. `Z^2 + Z_2 + Z_4`.
pub fn group_symbol<T: std::fmt::Display>(rank: usize, tors: &[T]) -> String {
    let mut terms = vec![];
    match rank {
        0 => (),
        1 => terms.push("Z".to_string()),
        r => terms.push(format!("Z^{r}")),
    }
    for t in tors {
        terms.push(format!("Z_{t}"));
    }
    if terms.is_empty() {
        "0".to_string()
    } else {
        terms.join(" + ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols() {
        assert_eq!(group_symbol::<i64>(0, &[]), "0");
        assert_eq!(group_symbol::<i64>(1, &[]), "Z");
        assert_eq!(group_symbol(2, &[2, 4]), "Z^2 + Z_2 + Z_4");
    }
}
