mod common;

// std
use std::{env, fs, process, sync::Arc};
// crates.io
use time::{Duration, OffsetDateTime};
// self
use common::{principal, unix};
use oauth2_session::{
	auth::{CredentialTuple, SessionStatus},
	error::ConfigError,
	store::{
		CredentialStore, EncodedTokenStore, FileStore, MemoryStore, SessionTokenCodec, StoreError,
	},
};

const KEY: &[u8] = b"0123456789abcdef0123456789abcdef";

fn sample() -> CredentialTuple {
	CredentialTuple::new("A1", unix(100)).with_refresh_token("R1")
}

async fn assert_round_trip(store: Arc<dyn CredentialStore>) {
	let alice = principal("alice");
	let bob = principal("bob");

	assert!(store.load(&alice).await.expect("Load should succeed.").is_none());

	store.save(&alice, sample()).await.expect("Save should succeed.");

	let flagged = sample().with_status(SessionStatus::RefreshError);

	store.save(&alice, flagged.clone()).await.expect("Overwrite should succeed.");

	assert_eq!(store.load(&alice).await.expect("Load should succeed."), Some(flagged));

	assert!(store.load(&bob).await.expect("Load should succeed.").is_none());
}

#[tokio::test]
async fn memory_store_honors_the_contract() {
	assert_round_trip(Arc::new(MemoryStore::default())).await;
}

#[tokio::test]
async fn file_store_honors_the_contract_and_survives_reopen() {
	let path = env::temp_dir().join(format!(
		"oauth2_session_store_it_{}_{}/store.json",
		process::id(),
		OffsetDateTime::now_utc().unix_timestamp_nanos(),
	));
	let store = FileStore::open(&path).expect("Failed to open file store.");

	assert_round_trip(Arc::new(store)).await;

	let reopened = FileStore::open(&path).expect("Failed to reopen file store.");
	let loaded = reopened
		.load(&principal("alice"))
		.await
		.expect("Load should succeed.")
		.expect("Tuple should survive reopen.");

	assert_eq!(loaded.status, SessionStatus::RefreshError);

	if let Some(dir) = path.parent() {
		fs::remove_dir_all(dir).unwrap_or_else(|e| {
			panic!("Failed to remove temporary store directory {}: {e}", dir.display())
		});
	}
}

#[tokio::test]
async fn encoded_store_ignores_principal_and_reissues_token() {
	let codec = SessionTokenCodec::new(KEY).expect("Key fixture should be accepted.");
	let store = EncodedTokenStore::new(codec.clone(), None);

	store.save(&principal("alice"), sample()).await.expect("Save should succeed.");

	let token = store.token().expect("Save should issue a token.");

	// The token travels with the session, so any principal reference reads it.
	assert_eq!(
		store.load(&principal("someone-else")).await.expect("Load should succeed."),
		Some(sample())
	);
	assert_eq!(codec.decode(&token).expect("Issued token should decode."), sample());
}

#[tokio::test]
async fn encoded_store_rejects_tampered_tokens() {
	let codec = SessionTokenCodec::new(KEY).expect("Key fixture should be accepted.");
	let token = codec.encode(&sample()).expect("Tuple should encode.");
	let mut tampered = token.into_bytes();
	let last = tampered.len() - 1;

	tampered[last] = if tampered[last] == b'A' { b'B' } else { b'A' };

	let tampered = String::from_utf8(tampered).expect("Tampered token should stay UTF-8.");
	let store = EncodedTokenStore::new(codec, Some(tampered));
	let err = store.load(&principal("alice")).await.expect_err("Tampered token must be rejected.");

	assert!(matches!(err, StoreError::InvalidToken { .. }));
}

#[tokio::test]
async fn wall_clock_tuples_round_trip_through_serialized_stores() {
	let tuple = CredentialTuple::new("A1", OffsetDateTime::now_utc() + Duration::hours(1))
		.with_refresh_token("R1");
	let codec = SessionTokenCodec::new(KEY).expect("Key fixture should be accepted.");
	let encoded = EncodedTokenStore::new(codec, None);

	encoded.save(&principal("alice"), tuple.clone()).await.expect("Save should succeed.");

	assert_eq!(
		encoded.load(&principal("alice")).await.expect("Load should succeed."),
		Some(tuple.clone())
	);

	let path = env::temp_dir().join(format!(
		"oauth2_session_wall_clock_{}_{}.json",
		process::id(),
		OffsetDateTime::now_utc().unix_timestamp_nanos(),
	));

	FileStore::open(&path)
		.expect("Failed to open file store.")
		.save(&principal("alice"), tuple.clone())
		.await
		.expect("Save should succeed.");

	let reopened = FileStore::open(&path).expect("Failed to reopen file store.");

	assert_eq!(reopened.load(&principal("alice")).await.expect("Load should succeed."), Some(tuple));

	fs::remove_file(&path).unwrap_or_else(|e| {
		panic!("Failed to remove temporary file store snapshot {}: {e}", path.display())
	});
}

#[test]
fn weak_signing_keys_are_rejected() {
	let err = SessionTokenCodec::new(&KEY[..16]).expect_err("Short key must be rejected.");

	assert!(matches!(err, ConfigError::WeakSigningKey { min: SessionTokenCodec::MIN_KEY_LEN }));
}
