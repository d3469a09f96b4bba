//! Signs a request on the client side and verifies it against an in-memory credential store,
//! then shows the replay guard refusing a second delivery.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
// self
use oauth1_gate::{
	auth::{AccessToken, Consumer, ConsumerKey, Credential, TokenKey},
	client::{self, RequestSigner},
	config::VerifierConfig,
	request::SignedRequest,
	signature::Parameters,
	store::{CredentialStore, MemoryStore},
	verifier::Verifier,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let consumer_key = ConsumerKey::new("demo-consumer")?;
	let token_key = TokenKey::new("demo-token")?;
	let store = Arc::new(MemoryStore::default());

	store.save_consumer(Consumer::new(consumer_key.clone(), "consumer-secret")).await?;
	store.save_token(AccessToken::new(consumer_key.clone(), token_key.clone(), "token-secret")).await?;

	let verifier = Verifier::new(store.clone(), store, VerifierConfig::default())?;
	let signer = RequestSigner::new(
		Credential::consumer(consumer_key, "consumer-secret").with_token(token_key, "token-secret"),
	);
	let url = "https://api.example.com/v1/orders?status=pending";
	let signed = signer.sign("GET", url, [("status", "pending")].into_iter().collect::<Parameters>())?;
	let header = client::authorization_header(&signed);

	println!("Authorization: {header}");

	let received = SignedRequest::new("GET", url).with_query_from_url()?.with_authorization_header(&header)?;
	let verified = verifier.verify(&received).await?;

	println!("accepted: {verified:?}");

	match verifier.verify(&received).await {
		Ok(_) => println!("replay unexpectedly accepted"),
		Err(e) => println!("replay refused ({}): {e}", e.status_code()),
	}

	Ok(())
}
