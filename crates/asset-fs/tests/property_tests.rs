use asset_fs::NormalizedPath;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_normalization_invariants(s in "\\PC*") {
        let path = NormalizedPath::new(&s);
        let as_str = path.as_str();

        prop_assert!(!as_str.contains('\\'));
        prop_assert!(!as_str.contains("//"));
        prop_assert!(as_str == "/" || !as_str.ends_with('/'));

        // Normalizing an already normalized path is the identity
        let roundtripped = NormalizedPath::new(path.to_native());
        prop_assert_eq!(path, roundtripped);
    }

    #[test]
    fn test_join_with_empty_is_identity(a in "\\PC*") {
        let p = NormalizedPath::new(&a);
        prop_assert_eq!(p.join(""), p.clone());
        prop_assert_eq!(p.join("/"), p);
    }

    #[test]
    fn test_strip_prefix_undoes_join(
        base in "[a-z]{1,8}(/[a-z]{1,8}){0,3}",
        rest in "[a-z]{1,8}(/[a-z.]{1,8}){0,3}",
    ) {
        let root = NormalizedPath::new(&base);
        let joined = root.join(&rest);

        prop_assert_eq!(joined.strip_prefix(&root), Some(rest.as_str()));
        prop_assert_eq!(joined.depth(), root.depth() + rest.split('/').count());
    }
}
