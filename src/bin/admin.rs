//! Operator tool for administrative passes that used to live in one-off
//! scripts. Talks to the database through the same store interface as the
//! server; never deployed behind the HTTP surface.

use clinic_booking_server::{
    config::Config,
    db, fanout,
    models::NotificationStatus,
    repo::{NotificationStore, postgres::PgStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cmd = std::env::args().nth(1).unwrap_or_default();
    let cfg = Config::from_env()?;
    let pool = db::connect_pg(&cfg.database_url).await?;
    let store = PgStore::new(pool);

    match cmd.as_str() {
        "fanout" => {
            let created = fanout::run(&store).await?;
            println!("created {created} notification(s)");
        }
        "pending" => {
            let pending = store
                .list_notifications(Some(NotificationStatus::Pending))
                .await?;
            println!("{} pending notification(s)", pending.len());
            for n in pending {
                println!("  #{} booking {} - {}", n.notification_id, n.booking_id, n.title);
            }
        }
        _ => {
            eprintln!("Usage: admin <fanout|pending>");
            std::process::exit(2);
        }
    }

    Ok(())
}
