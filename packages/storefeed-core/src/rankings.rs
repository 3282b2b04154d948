//! Chart positions of tracked apps.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use storefeed_config::{Platform, RankingTarget, TrackedApp};
use storefeed_provider::{ProviderManager, TopListQuery};

/// 1-based positions keyed by tracked app id. Apps outside the chart are absent.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Rankings {
    #[serde(default)]
    pub android: BTreeMap<String, usize>,
    #[serde(default)]
    pub ios: BTreeMap<String, usize>,
}

impl Rankings {
    pub fn for_platform(&self, platform: Platform) -> &BTreeMap<String, usize> {
        match platform {
            Platform::Android => &self.android,
            Platform::Ios => &self.ios,
        }
    }

    fn for_platform_mut(&mut self, platform: Platform) -> &mut BTreeMap<String, usize> {
        match platform {
            Platform::Android => &mut self.android,
            Platform::Ios => &mut self.ios,
        }
    }
}

/// Map a chart of store ids onto tracked app ids.
///
/// A store id listed more than once takes its last position.
pub fn match_rankings(
    list: &[String],
    apps: &[TrackedApp],
    platform: Platform,
) -> BTreeMap<String, usize> {
    let mut positions = BTreeMap::new();
    for (index, store_id) in list.iter().enumerate() {
        if let Some(app) = apps
            .iter()
            .find(|app| app.store_id(platform) == Some(store_id.as_str()))
        {
            positions.insert(app.id.clone(), index + 1);
        }
    }
    positions
}

pub struct RankingCollector<'a> {
    providers: &'a ProviderManager,
    delay: Duration,
    num: usize,
}

impl<'a> RankingCollector<'a> {
    pub fn new(providers: &'a ProviderManager, delay: Duration, num: usize) -> Self {
        Self {
            providers,
            delay,
            num,
        }
    }

    /// Look up each target chart in order, pausing between lookups.
    /// A failed lookup leaves that platform empty.
    pub async fn collect(&self, targets: &[RankingTarget], apps: &[TrackedApp]) -> Rankings {
        let mut rankings = Rankings::default();
        for (i, target) in targets.iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let query = TopListQuery {
                collection: target.collection.clone(),
                category: target.category.clone(),
                num: self.num,
            };
            match self.providers.get_top_list(target.platform, &query).await {
                Ok(list) => {
                    let positions = match_rankings(&list, apps, target.platform);
                    tracing::info!(
                        platform = %target.platform,
                        category = %target.category,
                        listed = list.len(),
                        matched = positions.len(),
                        "Rankings fetched"
                    );
                    *rankings.for_platform_mut(target.platform) = positions;
                }
                Err(e) => {
                    tracing::warn!(
                        platform = %target.platform,
                        category = %target.category,
                        "Failed to fetch rankings: {}",
                        e
                    );
                }
            }
        }
        rankings
    }
}
