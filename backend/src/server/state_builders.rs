//! Builders for the record stores and the services wired over them.

use std::io;
use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use twitter_api::domain::ports::CollectionMedium;
use twitter_api::domain::{Record, RecordStore, TweetFeedService, UserAccountService};
use twitter_api::inbound::http::health::CollectionProbe;
use twitter_api::inbound::http::state::HttpState;
use twitter_api::outbound::persistence::{JsonFileMedium, MemoryMedium};

use super::Storage;

pub(crate) const USERS: &str = "users";
pub(crate) const CREDENTIALS: &str = "credentials";
pub(crate) const TWEETS: &str = "tweets";

fn open_medium(storage: &Storage, collection: &str) -> io::Result<Arc<dyn CollectionMedium>> {
    match storage {
        Storage::Directory(dir) => {
            let medium = JsonFileMedium::open(dir, collection).map_err(|err| {
                io::Error::other(format!("failed to open {collection} collection: {err}"))
            })?;
            Ok(Arc::new(medium))
        }
        Storage::Ephemeral => Ok(Arc::new(MemoryMedium::empty())),
    }
}

/// Open a collection and check that its contents decode.
async fn open_store<R: Record>(
    storage: &Storage,
    collection: &str,
    clock: &Arc<dyn Clock>,
) -> io::Result<Arc<RecordStore<R>>> {
    let store = RecordStore::new(collection, open_medium(storage, collection)?, clock.clone());
    store
        .probe()
        .await
        .map_err(|err| io::Error::other(format!("{collection} collection is unusable: {err}")))?;
    info!(collection, "collection ready");
    Ok(Arc::new(store))
}

/// Handler state plus the collections readiness keeps checking.
pub(crate) struct AppState {
    pub(crate) http: HttpState,
    pub(crate) collections: Vec<Arc<dyn CollectionProbe>>,
}

/// Build handler state over the configured storage.
///
/// # Errors
/// Returns [`io::Error`] when a collection cannot be opened or holds
/// content that does not decode.
pub(crate) async fn build_app_state(
    storage: &Storage,
    clock: Arc<dyn Clock>,
) -> io::Result<AppState> {
    let users = open_store(storage, USERS, &clock).await?;
    let credentials = open_store(storage, CREDENTIALS, &clock).await?;
    let tweets = open_store(storage, TWEETS, &clock).await?;

    let collections = vec![
        users.clone() as Arc<dyn CollectionProbe>,
        credentials.clone() as Arc<dyn CollectionProbe>,
        tweets.clone() as Arc<dyn CollectionProbe>,
    ];
    let http = HttpState::new(
        Arc::new(UserAccountService::new(users, credentials)),
        Arc::new(TweetFeedService::new(tweets)),
    );
    Ok(AppState { http, collections })
}
