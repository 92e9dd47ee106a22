//! Print a fresh set of service signature headers
//!
//! Usage: `gen_apikey [service-name]`, with the key read from `SIGNATURE_KEY`.

use std::time::{SystemTime, UNIX_EPOCH};
use user::application::compute_signature;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let service_name = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "user-service".to_string());
    let key = std::env::var("SIGNATURE_KEY")
        .map_err(|_| anyhow::anyhow!("SIGNATURE_KEY must be set"))?;
    let request_at = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs().to_string();

    let api_key = compute_signature(&service_name, &key, &request_at);

    println!("x-service-name : {}", service_name);
    println!("x-request-at : {}", request_at);
    println!("x-api-key : {}", api_key);

    Ok(())
}
