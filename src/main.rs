use std::env;

use fees_eng::Engine;
use fees_eng::catalog::Catalog;
use fees_eng::csv::{read_charges, write_ledger};
use tokio_stream::wrappers::ReceiverStream;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse().unwrap()))
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let usage = "usage: fees-eng <catalog.json> <charges.csv>";
    let catalog_path = args.next().expect(usage);
    let charges_path = args.next().expect(usage);

    let catalog = Catalog::load(&catalog_path).expect("failed to load catalog");
    let mut engine = Engine::new(catalog.schedules, catalog.promos);

    let (charge_sender, charge_receiver) = tokio::sync::mpsc::channel(16);

    tokio::spawn(async move {
        for result in read_charges(&charges_path) {
            match result {
                Ok(charge) => {
                    charge_sender.send(charge).await.unwrap();
                }
                Err(e) => {
                    warn!("{e}");
                }
            }
        }
    });

    engine.run(ReceiverStream::new(charge_receiver)).await;

    write_ledger(engine.ledger());
}
