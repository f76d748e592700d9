use std::{ops::RangeInclusive, path::PathBuf, time::Duration};

use assertables::*;
use jiff::{Zoned, civil::date, tz::TimeZone};
use rstest::*;
use tempfile::{TempDir, tempdir};

use crate::{
    inventory::{Category, PreCode, Quantity, SequenceNumber, Tag},
    purchase::NewPurchaseLot,
    store::SqliteStore,
};

pub struct TestStore {
    pub dir: TempDir,
    pub store: SqliteStore,
}

impl TestStore {
    pub fn database(&self) -> PathBuf {
        self.dir.path().join("inventory.db")
    }

    /// Another handle on the same database file with its own connection.
    pub fn second_handle(&self) -> SqliteStore {
        assert_ok!(SqliteStore::open(&self.database(), Duration::from_secs(5)))
    }
}

#[fixture]
pub fn test_store() -> TestStore {
    let dir = assert_ok!(tempdir());
    let store = assert_ok!(SqliteStore::open(
        &dir.path().join("inventory.db"),
        Duration::from_secs(5)
    ));
    TestStore { dir, store }
}

pub fn pre_code(raw: &str) -> PreCode {
    assert_ok!(raw.parse::<PreCode>())
}

pub fn tag(raw: &str) -> Tag {
    assert_ok!(raw.parse::<Tag>())
}

pub fn quantity(value: i64) -> Quantity {
    assert_ok!(Quantity::try_from(value))
}

pub fn purchased_at(year: i16, month: i8, day: i8) -> Zoned {
    assert_ok!(date(year, month, day).at(9, 0, 0, 0).to_zoned(TimeZone::UTC))
}

pub async fn laptop(store: &SqliteStore) -> Category {
    assert_ok!(store.create_category("Laptop", pre_code("LAP")).await)
}

/// Builds a lot of laptop-style tags with the given sequence numbers.
pub fn lot(
    category: &Category,
    year: i16,
    month: i8,
    sequences: RangeInclusive<u64>,
) -> NewPurchaseLot {
    let tags: Vec<Tag> = sequences
        .map(|sequence| {
            let sequence = assert_ok!(SequenceNumber::try_from(sequence));
            assert_ok!(Tag::new(category.pre_code().clone(), year, month, sequence))
        })
        .collect();
    let quantity = quantity(assert_ok!(i64::try_from(tags.len())));
    NewPurchaseLot::new(
        category,
        quantity,
        tags,
        purchased_at(year, month, 1).timestamp(),
    )
}

/// Writes a history row whose tag text cannot be read, the way another tool
/// might have left it.
pub async fn insert_corrupt_tag(store: &SqliteStore, category: &Category, sequence: i64) {
    assert_ok!(
        store
            .execute_raw(&format!(
                "insert into issued_tag (category_id, sequence, tag) values ({}, {sequence}, '{}-2024-01-??')",
                i64::from(category.id()),
                category.pre_code()
            ))
            .await
    );
}
