mod asset;
mod category;
mod deletion;
mod purchase;

use anyhow::Result;
use assettags::{
    inventory::{CategoryId, PurchaseLotId},
    purchase::Purchasing,
    sequencer::TagSequencer,
    store::SqliteStore,
};
use clap::Subcommand;

use crate::config::Config;

#[derive(Subcommand)]
pub enum Command {
    /// Manage asset categories
    Category {
        #[command(subcommand)]
        command: CategoryCommand,
    },
    /// Show the tags a purchase would receive without purchasing
    Preview { category: CategoryId, quantity: String },
    /// Purchase units of a category and mint one tag per unit
    Purchase { category: CategoryId, quantity: String },
    /// List the purchase lots of a category
    Lots { category: CategoryId },
    /// Suggest the next purchased tag not yet carried by an asset
    NextTag { category: CategoryId },
    /// List the registered assets of a category
    Assets { category: CategoryId },
    /// Check whether an asset of the category already carries a tag
    Check { category: CategoryId, tag: String },
    /// Register a device, tagged with the next available tag unless one is given
    Register {
        category: CategoryId,
        name: String,
        #[arg(long, conflicts_with = "untagged")]
        tag: Option<String>,
        #[arg(long)]
        untagged: bool,
    },
    /// Delete a purchase lot, its tags are never minted again
    DeleteLot { lot: PurchaseLotId },
    /// Delete the asset carrying a tag, freeing the tag
    DeleteAsset { category: CategoryId, tag: String },
    /// List deleted lots and assets
    Deletions,
}

#[derive(Subcommand)]
pub enum CategoryCommand {
    /// Add a category, deriving its pre-code from the name unless given
    Add {
        name: String,
        #[arg(long)]
        pre_code: Option<String>,
    },
    /// List all categories
    List,
}

pub async fn run(command: Command, config: &Config) -> Result<()> {
    let store = SqliteStore::open(&config.database()?, config.busy_timeout())?;
    let purchasing = Purchasing::new(
        TagSequencer::new(store.clone()),
        config.allocation_attempts(),
    );

    match command {
        Command::Category {
            command: CategoryCommand::Add { name, pre_code },
        } => category::add(&store, &name, pre_code.as_deref()).await,
        Command::Category {
            command: CategoryCommand::List,
        } => category::list(&store).await,
        Command::Preview { category, quantity } => {
            purchase::preview(&purchasing, category, &quantity).await
        }
        Command::Purchase { category, quantity } => {
            purchase::purchase(&purchasing, category, &quantity).await
        }
        Command::Lots { category } => purchase::lots(&store, category).await,
        Command::NextTag { category } => asset::next_tag(purchasing.sequencer(), category).await,
        Command::Assets { category } => asset::list(&store, category).await,
        Command::Check { category, tag } => {
            asset::check(purchasing.sequencer(), category, &tag).await
        }
        Command::Register {
            category,
            name,
            tag,
            untagged,
        } => {
            let tag = if untagged {
                asset::Tagging::Untagged
            } else if let Some(tag) = tag {
                asset::Tagging::Given(tag)
            } else {
                asset::Tagging::NextAvailable
            };
            asset::register(purchasing.sequencer(), category, &name, tag).await
        }
        Command::DeleteLot { lot } => purchase::delete_lot(&store, lot).await,
        Command::DeleteAsset { category, tag } => {
            asset::delete(&store, category, &tag).await
        }
        Command::Deletions => deletion::list(&store).await,
    }
}
