/// Splits a query into tokens on whitespace.
///
/// Tokens are kept as written: no case folding, punctuation stripping or
/// stemming.
pub fn tokenize(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize(""), Vec::<String>::new());
        assert_eq!(tokenize("   "), Vec::<String>::new());
        assert_eq!(
            tokenize("снять 2к квартиру"),
            vec!["снять", "2к", "квартиру"]
        );
        assert_eq!(tokenize("  Lorem\tIPSUM \n dolor "), vec!["Lorem", "IPSUM", "dolor"]);
    }
}
