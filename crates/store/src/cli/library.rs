use clap::Args;
use jiff::Timestamp;

use tuckshop_store::{
    context::StoreContext,
    library::{self, LibraryEntry},
};

#[derive(Debug, Args)]
pub(crate) struct LibraryArgs {
    /// Include purchases whose paid period has lapsed
    #[arg(long)]
    all: bool,
}

pub(crate) async fn run(args: LibraryArgs, context: &StoreContext) -> Result<(), String> {
    let entries = context
        .orders
        .list_purchases()
        .await
        .map_err(|error| format!("failed to fetch purchases: {error}"))?;

    let (active, expired) = library::partition_active(entries, Timestamp::now());

    if active.is_empty() && (!args.all || expired.is_empty()) {
        println!("no purchases yet");
        return Ok(());
    }

    for entry in &active {
        println!("{}", describe(entry));
    }

    if args.all {
        for entry in &expired {
            println!("{} (expired)", describe(entry));
        }
    }

    Ok(())
}

fn describe(entry: &LibraryEntry) -> String {
    match entry.expires_at {
        Some(expires) => format!(
            "{}  {}  until {}",
            entry.title,
            entry.plan,
            expires.strftime("%Y-%m-%d")
        ),
        None => format!("{}  {}  lifetime", entry.title, entry.plan),
    }
}
