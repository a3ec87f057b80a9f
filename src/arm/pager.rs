//! Paged List Traversal
//!
//! List endpoints return `{"value": [...], "nextLink": "..."}`. Pages are
//! followed until no continuation is returned.

use super::client::ArmClient;
use super::error::ArmError;
use async_trait::async_trait;
use futures::stream::{self, Stream, TryStreamExt};
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// One page of results plus the continuation to the next
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
}

/// Anything that can fetch a page given an optional continuation
#[async_trait]
pub trait PageSource: Send + Sync {
    type Item: Send;

    async fn fetch_page(
        &self,
        continuation: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Page<Self::Item>, ArmError>;
}

/// Fetch every page, keeping items in arrival order.
///
/// Stops after the first page without a continuation. The cancellation
/// token is checked before every page.
pub async fn fetch_all<S>(source: &S, cancel: &CancellationToken) -> Result<Vec<S::Item>, ArmError>
where
    S: PageSource + ?Sized,
{
    let mut items = Vec::new();
    let mut continuation: Option<String> = None;
    let mut pages = 0usize;

    loop {
        if cancel.is_cancelled() {
            return Err(ArmError::Cancelled);
        }

        let page = source.fetch_page(continuation.as_deref(), cancel).await?;
        pages += 1;
        items.extend(page.items);

        match page.next {
            Some(next) => continuation = Some(next),
            None => break,
        }
    }

    tracing::debug!("Fetched {} items across {} pages", items.len(), pages);
    Ok(items)
}

/// Stream items page by page, fetching the next page only when needed
pub fn item_stream<'a, S>(
    source: &'a S,
    cancel: &'a CancellationToken,
) -> impl Stream<Item = Result<S::Item, ArmError>> + 'a
where
    S: PageSource + ?Sized,
    S::Item: 'a,
{
    // Some(None) is the first page, None means done
    stream::try_unfold(Some(None::<String>), move |state| async move {
        let Some(continuation) = state else {
            return Ok(None);
        };
        if cancel.is_cancelled() {
            return Err(ArmError::Cancelled);
        }

        let page = source.fetch_page(continuation.as_deref(), cancel).await?;
        let items = stream::iter(page.items.into_iter().map(Ok::<S::Item, ArmError>));
        Ok(Some((items, page.next.map(Some))))
    })
    .try_flatten()
}

#[derive(Debug, Deserialize)]
struct ArmList {
    #[serde(default)]
    value: Vec<Value>,
    #[serde(default, rename = "nextLink")]
    next_link: Option<String>,
}

/// Pages of an ARM collection
pub struct ArmListSource<'a> {
    client: &'a ArmClient,
    path: String,
    api_version: String,
}

impl<'a> ArmListSource<'a> {
    pub fn new(
        client: &'a ArmClient,
        path: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            client,
            path: path.into(),
            api_version: api_version.into(),
        }
    }
}

#[async_trait]
impl PageSource for ArmListSource<'_> {
    type Item = Value;

    async fn fetch_page(
        &self,
        continuation: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Page<Value>, ArmError> {
        // nextLink already carries api-version and the skip token
        let url = match continuation {
            Some(link) => self.client.parse_link(link)?,
            None => self.client.url_for(&self.path, &self.api_version),
        };

        let response = self.client.send(Method::GET, &url, None, cancel).await?;
        let list: ArmList = response.parse()?;

        Ok(Page {
            items: list.value,
            next: list.next_link.filter(|link| !link.is_empty()),
        })
    }
}
