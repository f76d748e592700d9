use std::{fs::create_dir_all, path::Path, str::FromStr, sync::Arc, time::Duration};

use include_dir::{Dir, include_dir};
use jiff::Timestamp;
use log::{debug, info, trace};
use rusqlite::{Connection, OptionalExtension, Row, TransactionBehavior, ffi, types::Type};
use rusqlite_migration::Migrations;
use tokio::sync::Mutex;

use crate::{
    inventory::{
        Category, CategoryId, PreCode, PurchaseLotId, Quantity, RegisteredAsset,
        SequenceNumber, Tag,
    },
    purchase::{NewPurchaseLot, PurchaseLot},
};

use super::{DeletionKind, DeletionRecord, StoreError, TagStore};

static MIGRATIONS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/migrations");

fn parsed_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(error)))
}

fn sequence_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<SequenceNumber> {
    let raw: i64 = row.get(idx)?;
    SequenceNumber::try_from(raw).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(idx, raw))
}

fn is_unique_violation(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                || failure.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

fn category_exists(db: &Connection, category: CategoryId) -> rusqlite::Result<bool> {
    db.query_one(
        "select exists(select 1 from category where id = ?1)",
        [i64::from(category)],
        |row| row.get(0),
    )
}

fn tags_of(db: &Connection, sql: &str, category: CategoryId) -> rusqlite::Result<Vec<String>> {
    let mut stmt = db.prepare_cached(sql)?;
    let tags = stmt
        .query_map([i64::from(category)], |row| row.get(0))?
        .collect();
    tags
}

fn record_deletion(db: &Connection, record: &DeletionRecord) -> rusqlite::Result<()> {
    trace!("recording deletion {record}");
    db.execute(
        "insert into deletion_log (kind, category_id, reference, deleted_at) values (?1, ?2, ?3, ?4)",
        (
            record.kind().to_string(),
            i64::from(record.category()),
            record.reference(),
            record.deleted_at().to_string(),
        ),
    )?;
    Ok(())
}

/// Inventory persisted in a single SQLite file.
///
/// Every handle owns one connection. Several handles on the same file behave
/// like independent application instances; the uniqueness of
/// `(category, sequence)` in `issued_tag` arbitrates between them.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    db: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open(database: &Path, busy_timeout: Duration) -> Result<Self, StoreError> {
        if let Some(parent) = database.parent() {
            create_dir_all(parent)?;
        }
        debug!("opening inventory {}", database.display());
        let mut db = Connection::open(database)?;
        db.busy_timeout(busy_timeout)?;
        db.execute_batch(
            "pragma journal_mode=wal;
            pragma synchronous=1;
            pragma foreign_keys=on;",
        )?;
        Migrations::from_directory(&MIGRATIONS_DIR)?.to_latest(&mut db)?;

        Ok(Self {
            db: Arc::new(Mutex::new(db)),
        })
    }

    pub async fn create_category(
        &self,
        name: &str,
        pre_code: PreCode,
    ) -> Result<Category, StoreError> {
        trace!("creating category {name} with pre-code {pre_code}");
        let db = self.db.lock().await;
        match db.execute(
            "insert into category (name, pre_code) values (?1, ?2)",
            (name, pre_code.as_str()),
        ) {
            Ok(_) => {}
            Err(error) if is_unique_violation(&error) => {
                return Err(StoreError::DuplicatePreCode(pre_code));
            }
            Err(error) => return Err(error.into()),
        }
        let category = Category::new(db.last_insert_rowid().into(), name.to_string(), pre_code);
        info!("created category {category}");

        Ok(category)
    }

    pub async fn categories(&self) -> Result<Vec<Category>, StoreError> {
        let db = self.db.lock().await;
        let mut stmt = db.prepare_cached("select id, name, pre_code from category order by id")?;
        let categories = stmt
            .query_map([], |row| Category::try_from(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(categories)
    }

    pub async fn lots(&self, category: CategoryId) -> Result<Vec<PurchaseLot>, StoreError> {
        trace!("listing lots of category {category}");
        let db = self.db.lock().await;
        let mut lots_stmt = db.prepare_cached(
            "select id, pre_code, quantity, purchased_at from purchase_lot
            where category_id = ?1 order by id",
        )?;
        let rows = lots_stmt
            .query_map([i64::from(category)], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    parsed_column::<PreCode>(row, 1)?,
                    row.get::<_, i64>(2)?,
                    parsed_column::<Timestamp>(row, 3)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut tags_stmt =
            db.prepare_cached("select tag from issued_tag where lot_id = ?1 order by sequence")?;
        let mut lots = Vec::with_capacity(rows.len());
        for (id, pre_code, quantity, purchased_at) in rows {
            let tags = tags_stmt
                .query_map([id], |row| parsed_column::<Tag>(row, 0))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            let quantity = Quantity::try_from(quantity)
                .map_err(|error| StoreError::Inconsistent(format!("lot {id}: {error}")))?;
            lots.push(PurchaseLot::new(
                id.into(),
                category,
                pre_code,
                quantity,
                tags,
                purchased_at,
            ));
        }

        Ok(lots)
    }

    /// Deletes a purchase lot. Its tags stay in the tag history so their
    /// sequence numbers are never issued again.
    pub async fn delete_lot(&self, id: PurchaseLotId) -> Result<DeletionRecord, StoreError> {
        let mut db = self.db.lock().await;
        let tx = db.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let category: Option<i64> = tx
            .query_one(
                "select category_id from purchase_lot where id = ?1",
                [i64::from(id)],
                |row| row.get(0),
            )
            .optional()?;
        let Some(category) = category else {
            return Err(StoreError::UnknownLot(id));
        };

        let detached = tx.execute(
            "update issued_tag set lot_id = null where lot_id = ?1",
            [i64::from(id)],
        )?;
        tx.execute("delete from purchase_lot where id = ?1", [i64::from(id)])?;
        let record = DeletionRecord::new(
            DeletionKind::Lot,
            category.into(),
            id.to_string(),
            Timestamp::now(),
        );
        record_deletion(&tx, &record)?;
        tx.commit()?;
        info!("deleted lot {id}, keeping its {detached} tags in history");

        Ok(record)
    }

    pub async fn register_asset(
        &self,
        category: CategoryId,
        name: &str,
        tag: Option<&Tag>,
    ) -> Result<RegisteredAsset, StoreError> {
        let db = self.db.lock().await;
        if !category_exists(&db, category)? {
            return Err(StoreError::UnknownCategory(category));
        }

        let tag = tag.map(ToString::to_string);
        let registered_at = Timestamp::now();
        match db.execute(
            "insert into registered_asset (category_id, name, tag, registered_at) values (?1, ?2, ?3, ?4)",
            (
                i64::from(category),
                name,
                tag.as_deref(),
                registered_at.to_string(),
            ),
        ) {
            Ok(_) => {}
            Err(error) if is_unique_violation(&error) => {
                return Err(StoreError::DuplicateTag {
                    category,
                    tag: tag.unwrap_or_default(),
                });
            }
            Err(error) => return Err(error.into()),
        }
        let asset = RegisteredAsset::new(
            db.last_insert_rowid(),
            category,
            name.to_string(),
            tag,
            registered_at,
        );
        info!("registered asset {name} in category {category}");

        Ok(asset)
    }

    pub async fn assets(&self, category: CategoryId) -> Result<Vec<RegisteredAsset>, StoreError> {
        let db = self.db.lock().await;
        let mut stmt = db.prepare_cached(
            "select id, category_id, name, tag, registered_at from registered_asset
            where category_id = ?1 order by id",
        )?;
        let assets = stmt
            .query_map([i64::from(category)], |row| RegisteredAsset::try_from(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(assets)
    }

    /// Deletes the asset carrying `tag` in the category's registry, ignoring
    /// case. The tag becomes available for assignment again.
    pub async fn delete_asset(
        &self,
        category: CategoryId,
        tag: &str,
    ) -> Result<DeletionRecord, StoreError> {
        let mut db = self.db.lock().await;
        let tx = db.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let asset: Option<(i64, String)> = tx
            .query_one(
                "select id, tag from registered_asset
                where category_id = ?1 and tag = ?2 collate nocase",
                (i64::from(category), tag),
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        let Some((id, stored_tag)) = asset else {
            return Err(StoreError::UnknownAsset {
                category,
                tag: tag.to_string(),
            });
        };

        tx.execute("delete from registered_asset where id = ?1", [id])?;
        let record = DeletionRecord::new(DeletionKind::Asset, category, stored_tag, Timestamp::now());
        record_deletion(&tx, &record)?;
        tx.commit()?;
        info!("deleted asset {id} tagged {tag} from category {category}");

        Ok(record)
    }

    pub async fn deletion_history(&self) -> Result<Vec<DeletionRecord>, StoreError> {
        let db = self.db.lock().await;
        let mut stmt = db.prepare_cached(
            "select kind, category_id, reference, deleted_at from deletion_log order by id",
        )?;
        let records = stmt
            .query_map([], |row| DeletionRecord::try_from(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(records)
    }

    #[cfg(test)]
    pub(crate) async fn execute_raw(&self, sql: &str) -> Result<(), StoreError> {
        self.db.lock().await.execute_batch(sql)?;
        Ok(())
    }
}

impl TagStore for SqliteStore {
    async fn category(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        trace!("looking up category {id}");
        let db = self.db.lock().await;
        let category = db
            .query_one(
                "select id, name, pre_code from category where id = ?1",
                [i64::from(id)],
                |row| Category::try_from(row),
            )
            .optional()?;

        Ok(category)
    }

    async fn tag_history(
        &self,
        category: CategoryId,
    ) -> Result<Vec<(SequenceNumber, String)>, StoreError> {
        trace!("reading tag history of category {category}");
        let db = self.db.lock().await;
        let mut stmt = db.prepare_cached(
            "select sequence, tag from issued_tag where category_id = ?1 order by sequence",
        )?;
        let history = stmt
            .query_map([i64::from(category)], |row| {
                Ok((sequence_column(row, 0)?, row.get(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(history)
    }

    async fn issued_tags(&self, category: CategoryId) -> Result<Vec<String>, StoreError> {
        trace!("reading issued tags of category {category}");
        let db = self.db.lock().await;
        Ok(tags_of(
            &db,
            "select tag from issued_tag where category_id = ?1 and lot_id is not null
            order by sequence",
            category,
        )?)
    }

    async fn consumed_tags(&self, category: CategoryId) -> Result<Vec<String>, StoreError> {
        trace!("reading consumed tags of category {category}");
        let db = self.db.lock().await;
        Ok(tags_of(
            &db,
            "select tag from registered_asset where category_id = ?1 and tag is not null
            order by id",
            category,
        )?)
    }

    async fn persist_lot(&self, lot: &NewPurchaseLot) -> Result<PurchaseLot, StoreError> {
        if lot.tags().is_empty() || lot.tags().len() != lot.quantity().get() as usize {
            return Err(StoreError::Inconsistent(format!(
                "lot of {} units for category {} carries {} tags",
                lot.quantity(),
                lot.category(),
                lot.tags().len()
            )));
        }

        let mut db = self.db.lock().await;
        let tx = db.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !category_exists(&tx, lot.category())? {
            return Err(StoreError::UnknownCategory(lot.category()));
        }

        tx.execute(
            "insert into purchase_lot (category_id, pre_code, quantity, purchased_at) values (?1, ?2, ?3, ?4)",
            (
                i64::from(lot.category()),
                lot.pre_code().as_str(),
                lot.quantity().get(),
                lot.purchased_at().to_string(),
            ),
        )?;
        let lot_id = tx.last_insert_rowid();
        {
            let mut insert = tx.prepare_cached(
                "insert into issued_tag (category_id, sequence, tag, lot_id) values (?1, ?2, ?3, ?4)",
            )?;
            for tag in lot.tags() {
                let sequence = i64::from(tag.sequence());
                match insert.execute((i64::from(lot.category()), sequence, tag.to_string(), lot_id)) {
                    Ok(_) => {}
                    Err(error) if is_unique_violation(&error) => {
                        debug!("tag {tag} has been issued concurrently");
                        return Err(StoreError::Conflict(lot.category()));
                    }
                    Err(error) => return Err(error.into()),
                }
            }
        }
        tx.commit()?;
        info!(
            "persisted lot {lot_id} of {} tags for category {}",
            lot.quantity(),
            lot.category()
        );

        Ok(lot.clone().into_persisted(lot_id.into()))
    }
}

impl TryFrom<&Row<'_>> for Category {
    type Error = rusqlite::Error;

    fn try_from(value: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self::new(
            value.get::<_, i64>(0)?.into(),
            value.get(1)?,
            parsed_column(value, 2)?,
        ))
    }
}

impl TryFrom<&Row<'_>> for RegisteredAsset {
    type Error = rusqlite::Error;

    fn try_from(value: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self::new(
            value.get(0)?,
            value.get::<_, i64>(1)?.into(),
            value.get(2)?,
            value.get(3)?,
            parsed_column(value, 4)?,
        ))
    }
}

impl TryFrom<&Row<'_>> for DeletionRecord {
    type Error = rusqlite::Error;

    fn try_from(value: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self::new(
            parsed_column(value, 0)?,
            value.get::<_, i64>(1)?.into(),
            value.get(2)?,
            parsed_column(value, 3)?,
        ))
    }
}
