//! Forum user pagination walk
//!
//! Collects every user with a non-empty home-page field by walking the
//! `/users` listing page by page until the reported page count is exhausted.

use crate::error::Result;
use crate::forum::client::{ForumApi, UsersPage};
use crate::types::{FetchStats, UserRecord};
use tracing::{debug, warn};

/// Walk all user pages and keep users with a home-page link
pub async fn fetch_users_with_home_page(
    api: &dyn ForumApi,
    per_page: u32,
) -> Result<(Vec<UserRecord>, FetchStats)> {
    let mut out: Vec<UserRecord> = Vec::new();
    let mut stats = FetchStats::default();
    let mut page = 1;

    loop {
        let raw = api.users_page(page, per_page).await?;
        let parsed = UsersPage::from_value(&raw);
        if raw.as_object().is_none() {
            warn!("Users page {} was not a JSON object, treating as empty", page);
        }

        let pages = parsed.pages.max(1);
        debug!("Users page {}/{}: {} users", page, pages, parsed.users.len());
        stats.total_users_seen += parsed.users.len();

        for user in parsed.users {
            let home_page = user.home_page.trim().to_string();
            if home_page.is_empty() {
                continue;
            }
            stats.total_with_home_page_any += 1;
            out.push(UserRecord { home_page, ..user });
        }

        page += 1;
        if page > pages {
            break;
        }
    }

    stats.total_with_www_saved = out.len();
    Ok((out, stats))
}
