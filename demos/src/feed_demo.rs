use chrono::Utc;
use dotenv::dotenv;
use fortis_auction::prelude::*;
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    pretty_env_logger::init();

    let state_dir = env::var("FORTIS_STATE_DIR").unwrap_or_else(|_| ".fortis".to_string());
    let client = FortisAuction::new_with_options(
        ClientOptions::from_env()?,
        Arc::new(FileSessionStore::in_dir(&state_dir)),
    );

    // The feed works anonymously; a stored session is used when present
    let session = client.auth().current_session().await;
    match &session {
        Some(s) => println!("Browsing as {}", s.name),
        None => println!("Browsing anonymously"),
    }

    let mut feed = client.feed();
    feed.load(client.listings(), session.as_ref()).await?;
    println!("Loaded {} active listings", feed.listings().len());

    let search = env::var("FORTIS_SEARCH").unwrap_or_default();
    let tags = env::var("FORTIS_TAGS").unwrap_or_default();
    feed.set_filter(FeedFilter::new(&search, &tags));
    log::info!("filter: search={:?} tags={:?}", search, tags);

    let now = Utc::now();
    let mut shown = 0;
    loop {
        let visible = feed.visible();
        for listing in visible.iter().skip(shown) {
            let summary = ListingSummary::from_listing(listing, now, client.options());
            println!(
                "- {} by {} [{}] {} bids, highest {} credits",
                summary.title,
                summary.seller_name,
                summary.status.as_str(),
                summary.bid_count,
                summary.highest_bid
            );
        }
        shown = visible.len();
        if !feed.has_more() {
            break;
        }
        println!("-- showing {} of {} --", feed.visible_count(), feed.filtered().len());
        feed.reveal_more();
    }

    Ok(())
}
