use anyhow::Result;
use assettags::store::SqliteStore;

pub async fn list(store: &SqliteStore) -> Result<()> {
    for record in store.deletion_history().await? {
        println!("{record}");
    }

    Ok(())
}
