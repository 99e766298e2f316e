#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn test_intern_and_lookup() {
    let mut pool = StringPool::new(PoolId::StringSpace);

    let hello = pool.try_intern("hello").unwrap();
    let world = pool.try_intern("world").unwrap();
    let hello2 = pool.try_intern("hello").unwrap();

    assert_eq!(hello, hello2);
    assert_ne!(hello, world);
    assert_eq!(pool.lookup(hello), "hello");
    assert_eq!(pool.lookup(world), "world");
}

#[test]
fn test_offsets_are_byte_positions() {
    let mut pool = StringPool::new(PoolId::StringSpace);

    let a = pool.try_intern("ab").unwrap();
    let b = pool.try_intern("cde").unwrap();

    assert_eq!(a.offset(), 0);
    assert_eq!(b.offset(), 3);
    assert_eq!(pool.dump(), b"ab\0cde\0");
    assert_eq!(pool.size(), 7);
}

#[test]
fn test_pools_compare_by_content() {
    let mut a = StringPool::new(PoolId::StringSpace);
    let mut b = StringPool::new(PoolId::StringSpace);
    a.try_intern("x").unwrap();
    assert_ne!(a, b);
    b.try_intern("x").unwrap();
    assert_eq!(a, b);
    assert_ne!(StringPool::new(PoolId::Namelist(0)), StringPool::new(PoolId::StringSpace));
}

#[test]
fn test_empty_pool_has_no_bytes() {
    let pool = StringPool::new(PoolId::Namelist(0));
    assert!(pool.is_empty());
    assert_eq!(pool.size(), 0);
    assert!(pool.dump().is_empty());
}

#[test]
fn test_find_does_not_intern() {
    let mut pool = StringPool::new(PoolId::StringSpace);
    assert_eq!(pool.find("missing"), None);
    assert_eq!(pool.size(), 0);

    let id = pool.try_intern("present").unwrap();
    assert_eq!(pool.find("present"), Some(id));
}

#[test]
fn test_foreign_handle_rejected() {
    let mut globals = StringPool::new(PoolId::StringSpace);
    let mut locals = StringPool::new(PoolId::Namelist(3));

    let global = globals.try_intern("x").unwrap();
    locals.try_intern("x").unwrap();

    assert_eq!(
        locals.resolve(global),
        Err(PoolError::ForeignHandle {
            expected: PoolId::Namelist(3),
            found: PoolId::StringSpace,
        })
    );
    assert_eq!(locals.lookup(global), "");
}

#[test]
fn test_mid_string_offset_rejected() {
    let mut pool = StringPool::new(PoolId::StringSpace);
    let id = pool.try_intern("abc").unwrap();
    let inner = StrId {
        pool: id.pool(),
        offset: 1,
    };
    assert!(matches!(
        pool.resolve(inner),
        Err(PoolError::BadOffset { offset: 1, .. })
    ));
}

#[test]
fn test_embedded_nul_rejected() {
    let mut pool = StringPool::new(PoolId::StringSpace);
    assert_eq!(pool.try_intern("a\0b"), Err(PoolError::EmbeddedNul));
    assert!(pool.is_empty());
}

#[test]
fn test_iter_in_interning_order() {
    let mut pool = StringPool::new(PoolId::StringSpace);
    pool.try_intern("b").unwrap();
    pool.try_intern("a").unwrap();
    pool.try_intern("b").unwrap();

    let texts: Vec<&str> = pool.iter().map(|(_, text)| text).collect();
    assert_eq!(texts, vec!["b", "a"]);
}

proptest! {
    #[test]
    fn prop_dump_splits_into_distinct_inputs(words in proptest::collection::vec("[a-z_]{0,6}", 0..40)) {
        let mut pool = StringPool::new(PoolId::StringSpace);
        for word in &words {
            pool.try_intern(word).unwrap();
        }

        let dump = pool.dump();
        prop_assert_eq!(dump.len(), pool.size());

        let mut pieces: Vec<&[u8]> = dump.split(|&b| b == 0).collect();
        if dump.is_empty() {
            pieces.clear();
        } else {
            // Trailing terminator leaves one empty tail piece.
            prop_assert_eq!(pieces.pop(), Some(&b""[..]));
        }

        let mut expected: Vec<&str> = Vec::new();
        for word in &words {
            if !expected.contains(&word.as_str()) {
                expected.push(word);
            }
        }
        let got: Vec<&str> = pieces.iter().map(|p| std::str::from_utf8(p).unwrap()).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_handles_are_stable(words in proptest::collection::vec("[a-z]{1,4}", 1..30)) {
        let mut pool = StringPool::new(PoolId::StringSpace);
        let first: Vec<StrId> = words.iter().map(|w| pool.try_intern(w).unwrap()).collect();
        let second: Vec<StrId> = words.iter().map(|w| pool.try_intern(w).unwrap()).collect();
        prop_assert_eq!(&first, &second);
        for (id, word) in first.iter().zip(&words) {
            prop_assert_eq!(pool.lookup(*id), word.as_str());
        }
    }
}
