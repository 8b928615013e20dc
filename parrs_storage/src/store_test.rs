//! Store test utilities.
//!
//! Shared checks of the store contract, run against every store implementation.

use std::error::Error;

use crate::{
    LockableStorageTraits, ReadableStorageTraits, StorageError, StoreKey, StoreKeyValue,
    WritableStorageTraits,
};

/// Write a set of values used by [`store_read`].
///
/// # Errors
/// Returns an error if a store request fails.
pub fn store_write<T: WritableStorageTraits>(store: &T) -> Result<(), Box<dyn Error>> {
    store.erase_all()?;
    store.put_many(
        &[
            StoreKeyValue::new("a", vec![0u8, 1]),
            StoreKeyValue::new(("b", "c"), vec![2u8]),
            StoreKeyValue::new(("b", "d", "e"), vec![3u8, 4, 5]),
            StoreKeyValue::new("f", Vec::<u8>::new()),
        ],
        true,
    )?;
    store.put_many(&[StoreKeyValue::new("a", vec![6u8])], false)?;
    Ok(())
}

/// Check the values written by [`store_write`].
///
/// # Errors
/// Returns an error if a store request fails or a value is incorrect.
pub fn store_read<T: ReadableStorageTraits>(store: &T) -> Result<(), Box<dyn Error>> {
    let keys = [
        StoreKey::from(("b", "d", "e")),
        StoreKey::from("a"),
        StoreKey::from(("b", "c")),
        StoreKey::from("f"),
    ];
    let values = store.get_many(&keys, true)?;
    assert_eq!(values, vec![vec![3u8, 4, 5], vec![6u8], vec![2u8], vec![]]);
    assert_eq!(store.get(&StoreKey::from("a"), false)?, vec![6u8]);
    assert!(store.contains(&StoreKey::from(("b", "c")))?);
    assert!(!store.contains(&StoreKey::from("b"))?);
    assert!(!store.contains(&StoreKey::from(("b", "d")))?);
    assert!(matches!(
        store.get_many(&[StoreKey::from("a"), StoreKey::from("missing")], false),
        Err(StorageError::KeyNotFound(key)) if key == StoreKey::from("missing")
    ));
    assert_eq!(store.get_many(&[], true)?, Vec::<crate::Bytes>::new());
    Ok(())
}

/// Check appending to new and existing values.
///
/// # Errors
/// Returns an error if a store request fails or a value is incorrect.
pub fn store_append<T: ReadableStorageTraits + WritableStorageTraits>(
    store: &T,
) -> Result<(), Box<dyn Error>> {
    store.erase_all()?;
    let key = StoreKey::from(("append", "x"));
    store.append_many(&[StoreKeyValue::new(&key, vec![1u8, 2])], true)?;
    store.append_many(
        &[
            StoreKeyValue::new(&key, vec![3u8]),
            StoreKeyValue::new("y", vec![9u8]),
            StoreKeyValue::new(&key, vec![4u8]),
        ],
        false,
    )?;
    assert_eq!(store.get(&key, true)?, vec![1u8, 2, 3, 4]);
    assert_eq!(store.get(&StoreKey::from("y"), true)?, vec![9u8]);

    store.ensure(&StoreKey::from("z"), "int8".into())?;
    store.ensure(&StoreKey::from("z"), "int8".into())?;
    assert_eq!(store.get(&StoreKey::from("z"), false)?, "int8");
    store.ensure(&StoreKey::from("z"), "int16".into())?;
    assert_eq!(store.get(&StoreKey::from("z"), false)?, "int16");
    Ok(())
}

/// Check erasing values.
///
/// # Errors
/// Returns an error if a store request fails or a value is incorrect.
pub fn store_erase<T: ReadableStorageTraits + WritableStorageTraits>(
    store: &T,
) -> Result<(), Box<dyn Error>> {
    store_write(store)?;
    store.erase_many(&[StoreKey::from("a"), StoreKey::from("missing")], true)?;
    assert!(!store.contains(&StoreKey::from("a"))?);
    assert!(store.contains(&StoreKey::from(("b", "c")))?);
    store.erase_all()?;
    assert!(!store.contains(&StoreKey::from(("b", "c")))?);
    assert!(store.get_many(&[StoreKey::from("f")], false).is_err());
    Ok(())
}

/// Check that the store lock is re-entrant for requests with `lock` set.
///
/// # Errors
/// Returns an error if a store request fails or a value is incorrect.
pub fn store_lock<T: ReadableStorageTraits + WritableStorageTraits + LockableStorageTraits>(
    store: &T,
) -> Result<(), Box<dyn Error>> {
    store.erase_all()?;
    let _guard = store.lock().lock();
    store.put_many(&[StoreKeyValue::new("locked", vec![1u8])], true)?;
    store.append_many(&[StoreKeyValue::new("locked", vec![2u8])], true)?;
    assert_eq!(store.get(&StoreKey::from("locked"), true)?, vec![1u8, 2]);
    store.erase_many(&[StoreKey::from("locked")], true)?;
    Ok(())
}
