use anyhow::Result;
use assettags::{inventory::PreCode, store::SqliteStore};
use log::trace;

pub async fn add(store: &SqliteStore, name: &str, pre_code: Option<&str>) -> Result<()> {
    let pre_code = match pre_code {
        Some(pre_code) => pre_code.to_ascii_uppercase().parse()?,
        None => {
            let derived = PreCode::derive(name)?;
            trace!("derived pre-code {derived} from {name:?}");
            derived
        }
    };
    let category = store.create_category(name, pre_code).await?;
    println!("{category}");

    Ok(())
}

pub async fn list(store: &SqliteStore) -> Result<()> {
    for category in store.categories().await? {
        println!("{category}");
    }

    Ok(())
}
