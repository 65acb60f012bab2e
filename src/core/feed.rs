//! Discovery feed: the paginated, filtered listing plus the trending,
//! recommended and nearby sections shown above it.
//!
//! The main grid never repeats a pet already shown in a featured section.

use crate::core::likes::{optimistic_toggle, LikeState, Likeable};
use crate::domain::model::{Identified, Insights, Pet, PetFilters, PetStats};
use crate::domain::ports::{PetSource, ToastSink};
use crate::utils::error::{ClientError, Result};
use std::collections::HashSet;

/// 排除已出現在任一精選清單中的項目，保留 `all` 的順序
pub fn exclude_featured<'a, T: Identified>(all: &'a [T], featured: &[&[T]]) -> Vec<&'a T> {
    let seen: HashSet<&str> = featured
        .iter()
        .flat_map(|list| list.iter().map(Identified::id))
        .collect();

    all.iter().filter(|item| !seen.contains(item.id())).collect()
}

/// 本地搜尋：名稱、品種、物種、地點，不分大小寫
pub fn matches_search(pet: &Pet, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    [
        Some(pet.name.as_str()),
        pet.breed.as_deref(),
        Some(pet.species.as_str()),
        pet.location.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(&needle))
}

#[derive(Debug, Clone, Default)]
pub struct Section<T> {
    pub data: T,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Section<T> {
    fn start(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// 成功時更新資料，失敗時保留舊資料並回傳錯誤
    fn finish(&mut self, result: Result<T>) -> Option<ClientError> {
        self.loading = false;
        match result {
            Ok(data) => {
                self.data = data;
                None
            }
            Err(e) => {
                self.error = Some(e.user_friendly_message());
                Some(e)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeedOptions {
    pub page_size: u32,
    pub featured_limit: u32,
    pub location: Option<String>,
}

impl Default for FeedOptions {
    fn default() -> Self {
        Self {
            page_size: 12,
            featured_limit: 6,
            location: None,
        }
    }
}

pub struct DiscoveryFeed<S: PetSource, T: ToastSink> {
    source: S,
    toasts: T,
    options: FeedOptions,
    filters: PetFilters,
    search: String,
    page: u32,
    pages: u32,
    total: u64,
    loading: bool,
    all: Vec<Pet>,
    trending: Section<Vec<Pet>>,
    recommended: Section<Vec<Pet>>,
    nearby: Section<Vec<Pet>>,
    stats: Section<PetStats>,
    insights: Section<Insights>,
}

impl<S: PetSource, T: ToastSink> DiscoveryFeed<S, T> {
    pub fn new(source: S, toasts: T, options: FeedOptions) -> Self {
        Self {
            source,
            toasts,
            options,
            filters: PetFilters::default(),
            search: String::new(),
            page: 1,
            pages: 1,
            total: 0,
            loading: false,
            all: Vec::new(),
            trending: Section::default(),
            recommended: Section::default(),
            nearby: Section::default(),
            stats: Section::default(),
            insights: Section::default(),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn pages(&self) -> u32 {
        self.pages
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn filters(&self) -> &PetFilters {
        &self.filters
    }

    /// 修改篩選條件，不會重新載入；需呼叫 `apply_filters`
    pub fn filters_mut(&mut self) -> &mut PetFilters {
        &mut self.filters
    }

    pub fn all(&self) -> &[Pet] {
        &self.all
    }

    pub fn trending(&self) -> &Section<Vec<Pet>> {
        &self.trending
    }

    pub fn recommended(&self) -> &Section<Vec<Pet>> {
        &self.recommended
    }

    pub fn nearby(&self) -> &Section<Vec<Pet>> {
        &self.nearby
    }

    pub fn stats(&self) -> &Section<PetStats> {
        &self.stats
    }

    pub fn insights(&self) -> &Section<Insights> {
        &self.insights
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    /// 主要列表：去除精選重複後再套用本地搜尋
    pub fn main_grid(&self) -> Vec<&Pet> {
        exclude_featured(
            &self.all,
            &[
                self.trending.data.as_slice(),
                self.recommended.data.as_slice(),
                self.nearby.data.as_slice(),
            ],
        )
        .into_iter()
        .filter(|pet| matches_search(pet, &self.search))
        .collect()
    }

    /// 以目前的篩選條件與頁碼重新載入主要列表
    pub async fn refresh(&mut self) -> Result<()> {
        self.loading = true;
        let result = self
            .source
            .list_pets(&self.filters, self.page, self.options.page_size)
            .await;
        self.loading = false;

        match result {
            Ok(page) => {
                self.all = page.items;
                self.total = page.total;
                self.pages = page.pages.max(1);
                tracing::debug!(
                    "Feed page {}/{} loaded with {} pets",
                    self.page,
                    self.pages,
                    self.all.len()
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to load pets: {}", e);
                self.toasts
                    .error(format!("Failed to load pets: {}", e.user_friendly_message()));
                Err(e)
            }
        }
    }

    /// 同時載入各精選區塊；各自獨立，失敗只影響自己的區塊
    pub async fn load_featured(&mut self) {
        let limit = self.options.featured_limit;
        let location = self
            .filters
            .location
            .clone()
            .or_else(|| self.options.location.clone());

        for section in [&mut self.trending, &mut self.recommended, &mut self.nearby] {
            section.start();
        }
        self.stats.start();
        self.insights.start();

        let (trending, recommended, nearby, stats, insights) = tokio::join!(
            self.source.trending(limit),
            self.source.recommended(limit),
            self.source.nearby(location.as_deref(), limit),
            self.source.stats(),
            self.source.insights(),
        );

        let failures = [
            ("trending pets", self.trending.finish(trending)),
            ("recommendations", self.recommended.finish(recommended)),
            ("nearby pets", self.nearby.finish(nearby)),
            ("statistics", self.stats.finish(stats)),
            ("insights", self.insights.finish(insights)),
        ];

        for (label, failure) in failures {
            if let Some(e) = failure {
                tracing::warn!("Failed to load {}: {}", label, e);
                self.toasts
                    .error(format!("Failed to load {}: {}", label, e.user_friendly_message()));
            }
        }
    }

    pub async fn load(&mut self) -> Result<()> {
        self.load_featured().await;
        self.refresh().await
    }

    /// 套用篩選：先回到第一頁再重新載入
    pub async fn apply_filters(&mut self) -> Result<()> {
        self.page = 1;
        self.refresh().await
    }

    pub async fn clear_filters(&mut self) -> Result<()> {
        self.filters = PetFilters::default();
        self.search.clear();
        self.apply_filters().await
    }

    /// 超出範圍的頁碼不做任何事並回傳 false
    pub async fn go_to_page(&mut self, page: u32) -> Result<bool> {
        if page < 1 || page > self.pages {
            tracing::debug!("Ignoring page {} outside 1..={}", page, self.pages);
            return Ok(false);
        }

        self.page = page;
        self.refresh().await?;
        Ok(true)
    }

    pub async fn next_page(&mut self) -> Result<bool> {
        self.go_to_page(self.page.saturating_add(1)).await
    }

    pub async fn prev_page(&mut self) -> Result<bool> {
        self.go_to_page(self.page.saturating_sub(1)).await
    }

    /// 樂觀按讚：同一隻寵物在各區塊的副本一起更新，失敗一起還原
    pub async fn toggle_like(&mut self, pet_id: &str) -> Result<LikeState> {
        let Some(current) = self.find(pet_id).map(Likeable::like_state) else {
            return Err(ClientError::NotFoundError {
                message: format!("pet {} is not in the feed", pet_id),
            });
        };

        let mut copies = [
            &mut self.all,
            &mut self.trending.data,
            &mut self.recommended.data,
            &mut self.nearby.data,
        ];
        optimistic_toggle(&self.source, &self.toasts, pet_id, current, |state| {
            copies
                .iter_mut()
                .flat_map(|list| list.iter_mut())
                .filter(|p| p.id == pet_id)
                .for_each(|p| p.set_like_state(state));
        })
        .await
    }

    pub fn find(&self, pet_id: &str) -> Option<&Pet> {
        self.all
            .iter()
            .chain(self.trending.data.iter())
            .chain(self.recommended.data.iter())
            .chain(self.nearby.data.iter())
            .find(|p| p.id == pet_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::toast::ToastLog;
    use crate::domain::model::{LikeStatus, Page};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    fn pet(id: &str) -> Pet {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("Pet {}", id),
            "species": "dog",
        }))
        .unwrap()
    }

    fn pets(ids: &[&str]) -> Vec<Pet> {
        ids.iter().map(|id| pet(id)).collect()
    }

    fn ids(list: &[&Pet]) -> Vec<String> {
        list.iter().map(|p| p.id.clone()).collect()
    }

    #[derive(Default)]
    struct Calls {
        list: Vec<(PetFilters, u32)>,
        likes: Vec<String>,
    }

    #[derive(Clone, Default)]
    struct MockSource {
        all: Vec<Pet>,
        pages: u32,
        trending: Vec<Pet>,
        recommended: Vec<Pet>,
        nearby: Vec<Pet>,
        fail_recommended: bool,
        fail_like: bool,
        calls: Arc<Mutex<Calls>>,
    }

    impl MockSource {
        fn list_calls(&self) -> Vec<(PetFilters, u32)> {
            self.calls.lock().unwrap().list.clone()
        }
    }

    #[async_trait]
    impl PetSource for MockSource {
        async fn list_pets(&self, filters: &PetFilters, page: u32, _: u32) -> Result<Page<Pet>> {
            self.calls.lock().unwrap().list.push((filters.clone(), page));
            Ok(Page {
                items: self.all.clone(),
                total: self.all.len() as u64,
                page,
                pages: self.pages,
            })
        }

        async fn trending(&self, _: u32) -> Result<Vec<Pet>> {
            Ok(self.trending.clone())
        }

        async fn recommended(&self, _: u32) -> Result<Vec<Pet>> {
            if self.fail_recommended {
                return Err(ClientError::from_status(500, "recommendation engine down"));
            }
            Ok(self.recommended.clone())
        }

        async fn nearby(&self, _: Option<&str>, _: u32) -> Result<Vec<Pet>> {
            Ok(self.nearby.clone())
        }

        async fn stats(&self) -> Result<PetStats> {
            Ok(PetStats {
                total_pets: self.all.len() as u64,
                ..Default::default()
            })
        }

        async fn insights(&self) -> Result<Insights> {
            Ok(Insights::default())
        }

        async fn toggle_like(&self, pet_id: &str) -> Result<LikeStatus> {
            self.calls.lock().unwrap().likes.push(pet_id.to_string());
            if self.fail_like {
                return Err(ClientError::from_status(503, "try later"));
            }
            Ok(LikeStatus {
                is_liked: true,
                like_count: 42,
            })
        }
    }

    #[test]
    fn test_exclude_featured_preserves_order() {
        let all = pets(&["A", "B", "C"]);
        let trending = pets(&["B"]);

        let none: &[Pet] = &[];
        let grid = exclude_featured(&all, &[trending.as_slice(), none, none]);

        assert_eq!(ids(&grid), vec!["A", "C"]);
    }

    #[test]
    fn test_exclude_featured_covers_all_three_lists() {
        let all = pets(&["A", "B", "C", "D", "E"]);
        let trending = pets(&["E"]);
        let recommended = pets(&["A", "X"]);
        let nearby = pets(&["C"]);

        let grid = exclude_featured(
            &all,
            &[trending.as_slice(), recommended.as_slice(), nearby.as_slice()],
        );

        assert_eq!(ids(&grid), vec!["B", "D"]);
        for featured in trending.iter().chain(&recommended).chain(&nearby) {
            assert!(grid.iter().all(|p| p.id != featured.id));
        }
    }

    #[test]
    fn test_exclude_featured_edge_cases() {
        let all = pets(&["A", "B"]);
        let none: &[Pet] = &[];
        assert_eq!(ids(&exclude_featured(&all, &[none, none, none])), vec!["A", "B"]);

        let empty: Vec<Pet> = Vec::new();
        assert!(exclude_featured(&empty, &[all.as_slice()]).is_empty());
    }

    #[test]
    fn test_matches_search_fields() {
        let mut p = pet("1");
        p.breed = Some("Golden Retriever".to_string());
        p.location = Some("Austin".to_string());

        assert!(matches_search(&p, "golden"));
        assert!(matches_search(&p, "AUSTIN"));
        assert!(matches_search(&p, "dog"));
        assert!(matches_search(&p, "  "));
        assert!(!matches_search(&p, "cat"));
    }

    #[tokio::test]
    async fn test_load_populates_sections_and_dedupes_grid() {
        let source = MockSource {
            all: pets(&["A", "B", "C", "D"]),
            pages: 1,
            trending: pets(&["B"]),
            recommended: pets(&["D"]),
            ..Default::default()
        };
        let toasts = ToastLog::new();
        let mut feed = DiscoveryFeed::new(source, toasts.clone(), FeedOptions::default());

        feed.load().await.unwrap();

        assert_eq!(ids(&feed.main_grid()), vec!["A", "C"]);
        assert_eq!(feed.stats().data.total_pets, 4);
        assert!(!feed.trending().loading);
        assert!(toasts.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_failed_section_does_not_block_others() {
        let source = MockSource {
            all: pets(&["A", "B"]),
            pages: 1,
            trending: pets(&["A"]),
            nearby: pets(&["N"]),
            fail_recommended: true,
            ..Default::default()
        };
        let toasts = ToastLog::new();
        let mut feed = DiscoveryFeed::new(source, toasts.clone(), FeedOptions::default());

        feed.load_featured().await;

        assert_eq!(feed.trending().data.len(), 1);
        assert_eq!(feed.nearby().data.len(), 1);
        assert!(feed.recommended().error.is_some());
        assert!(!feed.recommended().loading);
        assert_eq!(toasts.errors().len(), 1);
        assert!(toasts.errors()[0].contains("recommendations"));
    }

    #[tokio::test]
    async fn test_go_to_page_out_of_bounds_is_noop() {
        let source = MockSource {
            all: pets(&["A"]),
            pages: 3,
            ..Default::default()
        };
        let mut feed = DiscoveryFeed::new(source.clone(), ToastLog::new(), FeedOptions::default());
        feed.refresh().await.unwrap();
        assert_eq!(source.list_calls().len(), 1);

        assert!(!feed.go_to_page(4).await.unwrap());
        assert!(!feed.go_to_page(0).await.unwrap());
        assert_eq!(feed.page(), 1);
        assert_eq!(source.list_calls().len(), 1);

        assert!(feed.go_to_page(3).await.unwrap());
        assert_eq!(feed.page(), 3);
        assert!(!feed.next_page().await.unwrap());
        assert_eq!(feed.page(), 3);
        assert!(feed.prev_page().await.unwrap());
        assert_eq!(feed.page(), 2);
    }

    #[tokio::test]
    async fn test_apply_filters_resets_page_before_refetch() {
        let source = MockSource {
            all: pets(&["A"]),
            pages: 5,
            ..Default::default()
        };
        let mut feed = DiscoveryFeed::new(source.clone(), ToastLog::new(), FeedOptions::default());
        feed.refresh().await.unwrap();
        feed.go_to_page(4).await.unwrap();

        feed.filters_mut().species = Some("cat".to_string());
        // editing filters alone does not refetch
        assert_eq!(source.list_calls().len(), 2);

        feed.apply_filters().await.unwrap();

        let calls = source.list_calls();
        let (filters, page) = calls.last().unwrap();
        assert_eq!(*page, 1);
        assert_eq!(filters.species.as_deref(), Some("cat"));
        assert_eq!(feed.page(), 1);
    }

    #[tokio::test]
    async fn test_local_search_filters_main_grid_without_refetch() {
        let mut all = pets(&["A", "B"]);
        all[1].name = "Whiskers".to_string();
        let source = MockSource {
            all,
            pages: 1,
            ..Default::default()
        };
        let mut feed = DiscoveryFeed::new(source.clone(), ToastLog::new(), FeedOptions::default());
        feed.refresh().await.unwrap();

        feed.set_search("whisk");

        assert_eq!(ids(&feed.main_grid()), vec!["B"]);
        assert_eq!(source.list_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_toggle_like_updates_every_copy() {
        let source = MockSource {
            all: pets(&["A", "B"]),
            pages: 1,
            trending: pets(&["A"]),
            ..Default::default()
        };
        let mut feed = DiscoveryFeed::new(source, ToastLog::new(), FeedOptions::default());
        feed.load().await.unwrap();

        let state = feed.toggle_like("A").await.unwrap();

        assert_eq!(state.like_count, 42);
        assert!(feed.all()[0].is_liked);
        assert!(feed.trending().data[0].is_liked);
        assert_eq!(feed.trending().data[0].like_count, 42);
    }

    #[tokio::test]
    async fn test_toggle_like_reverts_on_failure() {
        let source = MockSource {
            all: pets(&["A"]),
            pages: 1,
            fail_like: true,
            ..Default::default()
        };
        let toasts = ToastLog::new();
        let mut feed = DiscoveryFeed::new(source, toasts.clone(), FeedOptions::default());
        feed.refresh().await.unwrap();

        assert!(feed.toggle_like("A").await.is_err());

        assert!(!feed.all()[0].is_liked);
        assert_eq!(feed.all()[0].like_count, 0);
        assert_eq!(toasts.errors().len(), 1);
    }

    #[tokio::test]
    async fn test_toggle_like_unknown_pet() {
        let source = MockSource::default();
        let mut feed = DiscoveryFeed::new(source.clone(), ToastLog::new(), FeedOptions::default());

        let err = feed.toggle_like("ghost").await.unwrap_err();

        assert!(matches!(err, ClientError::NotFoundError { .. }));
        assert!(source.calls.lock().unwrap().likes.is_empty());
    }
}
