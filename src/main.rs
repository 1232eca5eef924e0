//! Command-line front end for ad-hoc queries against a configured catalog

use anyhow::{bail, Context};
use tracing_subscriber::EnvFilter;

use ils_gateway::services::PlaceRequestDetails;
use ils_gateway::services::{
    AccountView, HoldingsLookup, PatronAuth, PickupDirectory, RequestPlacement, StatusLookup,
};
use ils_gateway::GatewayConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = GatewayConfig::load().context("failed to load configuration")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .init();

    let connector = ils_gateway::connect(&config)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("help");
    match command {
        "status" => {
            let ids = args[1..].to_vec();
            if ids.is_empty() {
                bail!("usage: status <bib-id>...");
            }
            let statuses = connector.status.get_statuses(&ids).await?;
            println!("{}", serde_json::to_string_pretty(&statuses)?);
        }
        "holding" => {
            let id = args.get(1).context("usage: holding <record-id>")?;
            let holdings = connector
                .holdings
                .as_ref()
                .context("the configured driver has no holdings lookup")?
                .get_holding(id)
                .await?;
            println!("{}", serde_json::to_string_pretty(&holdings)?);
        }
        "login" => {
            let (username, password) = match (args.get(1), args.get(2)) {
                (Some(u), Some(p)) => (u, p),
                _ => bail!("usage: login <username> <password>"),
            };
            let auth = connector
                .auth
                .as_ref()
                .context("the configured driver has no patron authentication")?;
            match auth.patron_login(username, password).await? {
                Some(patron) => println!("{}", serde_json::to_string_pretty(&patron)?),
                None => bail!("login rejected"),
            }
        }
        "loans" | "fines" | "holds" => {
            let (username, password) = match (args.get(1), args.get(2)) {
                (Some(u), Some(p)) => (u, p),
                _ => bail!("usage: {} <username> <password>", command),
            };
            let auth = connector
                .auth
                .as_ref()
                .context("the configured driver has no patron authentication")?;
            let patron = auth
                .patron_login(username, password)
                .await?
                .context("login rejected")?;
            let account = connector
                .account
                .as_ref()
                .context("the configured driver has no account view")?;
            match command {
                "loans" => println!(
                    "{}",
                    serde_json::to_string_pretty(&account.get_my_transactions(&patron).await?)?
                ),
                "fines" => {
                    let (fines, summary) = account.get_my_fines_summary(&patron).await?;
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&serde_json::json!({
                            "fines": fines,
                            "summary": summary,
                        }))?
                    );
                }
                _ => println!(
                    "{}",
                    serde_json::to_string_pretty(&account.get_my_holds(&patron).await?)?
                ),
            }
        }
        "hold" => {
            let (username, password, bib_id, item_id) =
                match (args.get(1), args.get(2), args.get(3), args.get(4)) {
                    (Some(u), Some(p), Some(b), Some(i)) => (u, p, b, i),
                    _ => bail!("usage: hold <username> <password> <bib-id> <item-id>"),
                };
            let auth = connector
                .auth
                .as_ref()
                .context("the configured driver has no patron authentication")?;
            let patron = auth
                .patron_login(username, password)
                .await?
                .context("login rejected")?;
            let placement = connector
                .placement
                .as_ref()
                .context("the configured driver has no request placement")?;
            let details = PlaceRequestDetails {
                bib_id: bib_id.clone(),
                item_id: item_id.clone(),
                ..Default::default()
            };
            let outcome = placement.place_hold(&patron, &details).await;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        "pickup" => {
            let pickup = connector
                .pickup
                .as_ref()
                .context("the configured driver has no pickup directory")?;
            let locations = pickup.get_pickup_locations().await?;
            println!("{}", serde_json::to_string_pretty(&locations)?);
        }
        _ => {
            eprintln!(
                "usage: ils-gateway <command>\n\
                 \n\
                 commands:\n\
                 \x20 status <bib-id>...                          item statuses\n\
                 \x20 holding <record-id>                         full holdings\n\
                 \x20 login <username> <password>                 authenticate a patron\n\
                 \x20 loans <username> <password>                 checked-out items\n\
                 \x20 fines <username> <password>                 fines and their total\n\
                 \x20 holds <username> <password>                 outstanding holds\n\
                 \x20 hold <username> <password> <bib> <item>     place a hold\n\
                 \x20 pickup                                      pickup locations"
            );
        }
    }
    Ok(())
}
