use anyhow::{Result, bail};
use assettags::{
    inventory::{Category, CategoryId, Tag},
    sequencer::TagSequencer,
    store::SqliteStore,
};
use log::debug;

pub enum Tagging {
    Given(String),
    NextAvailable,
    Untagged,
}

/// Parses a manually entered tag, which has to carry the category's pre-code.
fn tag_of(category: &Category, raw: &str) -> Result<Tag> {
    let tag: Tag = raw.trim().to_ascii_uppercase().parse()?;
    if tag.pre_code() != category.pre_code() {
        bail!(
            "tag {tag} does not belong to category {}, its tags start with {}",
            category.id(),
            category.pre_code()
        );
    }

    Ok(tag)
}

pub async fn next_tag(sequencer: &TagSequencer<SqliteStore>, category: CategoryId) -> Result<()> {
    let tag = sequencer.find_next_available_tag(category).await?;
    println!("{tag}");

    Ok(())
}

pub async fn check(
    sequencer: &TagSequencer<SqliteStore>,
    category: CategoryId,
    tag: &str,
) -> Result<()> {
    if sequencer.is_duplicate_tag(category, tag.trim()).await? {
        println!("{tag} is already carried by an asset of category {category}");
    } else {
        println!("{tag} is free in category {category}");
    }

    Ok(())
}

pub async fn register(
    sequencer: &TagSequencer<SqliteStore>,
    category: CategoryId,
    name: &str,
    tagging: Tagging,
) -> Result<()> {
    let category = sequencer.category(category).await?;
    let tag = match tagging {
        Tagging::Given(raw) => {
            let tag = tag_of(&category, &raw)?;
            if sequencer
                .is_duplicate_tag(category.id(), &tag.to_string())
                .await?
            {
                bail!("tag {tag} is already carried by an asset of category {category}");
            }
            Some(tag)
        }
        Tagging::NextAvailable => {
            let tag = sequencer.find_next_available_tag(category.id()).await?;
            debug!("assigning next available tag {tag}");
            Some(tag)
        }
        Tagging::Untagged => None,
    };

    let asset = sequencer
        .store()
        .register_asset(category.id(), name, tag.as_ref())
        .await?;
    match asset.tag() {
        Some(tag) => println!("{} {} {tag}", asset.id(), asset.name()),
        None => println!("{} {}", asset.id(), asset.name()),
    }

    Ok(())
}

pub async fn list(store: &SqliteStore, category: CategoryId) -> Result<()> {
    for asset in store.assets(category).await? {
        println!(
            "{} {:.0} {} {} {}",
            asset.id(),
            asset.registered_at(),
            asset.category(),
            asset.tag().as_deref().unwrap_or("-"),
            asset.name()
        );
    }

    Ok(())
}

pub async fn delete(store: &SqliteStore, category: CategoryId, tag: &str) -> Result<()> {
    let record = store.delete_asset(category, tag.trim()).await?;
    println!("{record}");

    Ok(())
}
