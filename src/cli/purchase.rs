use anyhow::Result;
use assettags::{
    inventory::{CategoryId, PurchaseLotId, Quantity},
    purchase::Purchasing,
    sequencer::SequencerError,
    store::SqliteStore,
};
use jiff::Zoned;

fn quantity(raw: &str) -> Result<Quantity, SequencerError> {
    Ok(raw.parse::<Quantity>()?)
}

pub async fn preview(
    purchasing: &Purchasing<SqliteStore>,
    category: CategoryId,
    quantity_arg: &str,
) -> Result<()> {
    let tags = purchasing
        .preview(category, quantity(quantity_arg)?, &Zoned::now())
        .await?;
    for tag in tags {
        println!("{tag}");
    }

    Ok(())
}

pub async fn purchase(
    purchasing: &Purchasing<SqliteStore>,
    category: CategoryId,
    quantity_arg: &str,
) -> Result<()> {
    let lot = purchasing
        .purchase(category, quantity(quantity_arg)?, &Zoned::now())
        .await?;
    println!("lot {}", lot.id());
    for tag in lot.tags() {
        println!("{tag}");
    }

    Ok(())
}

pub async fn lots(store: &SqliteStore, category: CategoryId) -> Result<()> {
    for lot in store.lots(category).await? {
        let range = match (lot.tags().first(), lot.tags().last()) {
            (Some(first), Some(last)) if first != last => format!("{first} .. {last}"),
            (Some(only), _) => only.to_string(),
            _ => String::new(),
        };
        println!(
            "{} {:.0} {} x {} {range}",
            lot.id(),
            lot.purchased_at(),
            lot.quantity(),
            lot.pre_code()
        );
    }

    Ok(())
}

pub async fn delete_lot(store: &SqliteStore, lot: PurchaseLotId) -> Result<()> {
    let record = store.delete_lot(lot).await?;
    println!("{record}");

    Ok(())
}
