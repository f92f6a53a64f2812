//! Data Transfer Objects for the API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use moodmap::cache::{ApiStatsSnapshot, CacheStats};
use moodmap::core::Pagination;
use moodmap::models::{
    AiSummary, BookmarkView, Comment, Image, InferenceOutcome, InferenceSession, MyPage, Page,
    Place, PlaceView, PublicProfile, RecommendedPlace, Review, SavedPlace, SavedPlaceView,
    SessionDetail, SessionEntry, StoreCard, Tag, TagOptions, User,
};

// Tags

/// Emotion or location tag
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TagDto {
    pub id: String,
    pub name: String,
}

impl From<Tag> for TagDto {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
        }
    }
}

fn tags(tags: Vec<Tag>) -> Vec<TagDto> {
    tags.into_iter().map(TagDto::from).collect()
}

/// Request to create or rename a tag
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TagRequest {
    pub name: String,
}

/// Emotions and locations, both ordered by id
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TagOptionsDto {
    pub emotions: Vec<TagDto>,
    pub locations: Vec<TagDto>,
}

impl From<TagOptions> for TagOptionsDto {
    fn from(options: TagOptions) -> Self {
        Self {
            emotions: tags(options.emotions),
            locations: tags(options.locations),
        }
    }
}

// Users

/// Account as seen by its owner
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: String,
    pub email: String,
    pub nickname: String,
    /// Taste profile phrase
    pub detail: String,
    pub profile_image_url: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            nickname: user.nickname,
            detail: user.detail,
            profile_image_url: user.profile_image_url,
            role: user.role.to_string(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Public part of a user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileDto {
    pub id: String,
    pub nickname: String,
    pub detail: String,
    pub profile_image_url: Option<String>,
}

impl From<PublicProfile> for ProfileDto {
    fn from(profile: PublicProfile) -> Self {
        Self {
            id: profile.id,
            nickname: profile.nickname,
            detail: profile.detail,
            profile_image_url: profile.profile_image_url,
        }
    }
}

// Memories

/// Image attached to a memory
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImageDto {
    pub image_id: String,
    pub image_url: String,
}

impl From<Image> for ImageDto {
    fn from(image: Image) -> Self {
        Self {
            image_id: image.id,
            image_url: image.image_url,
        }
    }
}

fn images(images: Vec<Image>) -> Vec<ImageDto> {
    images.into_iter().map(ImageDto::from).collect()
}

/// Memory with author, tags and images
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MemoryDto {
    pub id: String,
    pub user_id: String,
    /// Author nickname
    pub nickname: String,
    pub content: String,
    pub emotions: Vec<TagDto>,
    pub location: Option<TagDto>,
    pub images: Vec<ImageDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<moodmap::models::MemoryView> for MemoryDto {
    fn from(view: moodmap::models::MemoryView) -> Self {
        Self {
            id: view.memory.id,
            user_id: view.memory.user_id,
            nickname: view.nickname,
            content: view.memory.content,
            emotions: tags(view.emotions),
            location: view.location.map(TagDto::from),
            images: images(view.images),
            created_at: view.memory.created_at,
            updated_at: view.memory.updated_at,
        }
    }
}

/// Request to create a memory
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateMemoryRequest {
    pub content: String,

    /// At most three emotion ids
    #[serde(default)]
    pub emotion_ids: Vec<String>,

    pub location_id: Option<String>,
}

/// Request to update a memory. Absent fields are left alone; an empty
/// `location_id` clears the location.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateMemoryRequest {
    pub content: Option<String>,
    pub emotion_ids: Option<Vec<String>>,
    pub location_id: Option<String>,
}

/// Page of memories, newest first
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MemoryListResponse {
    pub items: Vec<MemoryDto>,
    pub total: usize,
    pub page: usize,
    pub size: usize,
}

impl From<Page<moodmap::models::MemoryView>> for MemoryListResponse {
    fn from(page: Page<moodmap::models::MemoryView>) -> Self {
        Self {
            items: page.items.into_iter().map(MemoryDto::from).collect(),
            total: page.total,
            page: page.page,
            size: page.size,
        }
    }
}

/// Memory listing filters and paging
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct MemoryListParams {
    /// Page number, 1-based
    pub page: Option<usize>,
    /// Items per page
    pub size: Option<usize>,
    pub emotion_id: Option<String>,
    pub location_id: Option<String>,
    /// Author
    pub user_id: Option<String>,
}

/// Plain paging parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PageParams {
    /// Page number, 1-based
    pub page: Option<usize>,
    /// Items per page
    pub size: Option<usize>,
}

impl From<&PageParams> for Pagination {
    fn from(params: &PageParams) -> Self {
        Pagination {
            page: params.page,
            size: params.size,
        }
    }
}

// Comments and bookmarks

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentDto {
    pub id: String,
    pub memory_id: String,
    pub user_id: String,
    pub nickname: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Comment> for CommentDto {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            memory_id: comment.memory_id,
            user_id: comment.user_id,
            nickname: comment.nickname,
            content: comment.content,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CommentRequest {
    pub content: String,
}

/// Bookmark with the memory it points at
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookmarkDto {
    pub id: String,
    pub memory_id: String,
    pub memory_content: String,
    pub images: Vec<ImageDto>,
    pub created_at: DateTime<Utc>,
}

impl From<BookmarkView> for BookmarkDto {
    fn from(view: BookmarkView) -> Self {
        Self {
            id: view.bookmark.id,
            memory_id: view.bookmark.memory_id,
            memory_content: view.memory_content,
            images: images(view.images),
            created_at: view.bookmark.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookmarkRequest {
    pub memory_id: String,
}

// Places

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReviewDto {
    pub text: String,
    pub rating: Option<f64>,
    /// Unix seconds
    pub time: Option<i64>,
    pub author: Option<String>,
}

impl From<Review> for ReviewDto {
    fn from(review: Review) -> Self {
        Self {
            text: review.text,
            rating: review.rating,
            time: review.time,
            author: review.author,
        }
    }
}

/// Place record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlaceDto {
    /// Shop id
    pub id: String,
    pub google_place_id: String,
    pub name: String,
    pub address: String,
    pub location_id: String,
    pub emotion_ids: Vec<String>,
    pub image_url: Option<String>,
    pub google_rating: Option<f64>,
    pub reviews: Vec<ReviewDto>,
    pub place_types: Vec<String>,
    /// operating, closed or moved
    pub status: String,
    pub status_label: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Place> for PlaceDto {
    fn from(place: Place) -> Self {
        Self {
            id: place.id,
            google_place_id: place.google_place_id,
            name: place.name,
            address: place.address,
            location_id: place.location_id,
            emotion_ids: place.emotion_ids,
            image_url: place.image_url,
            google_rating: place.google_rating,
            reviews: place.reviews.into_iter().map(ReviewDto::from).collect(),
            place_types: place.place_types,
            status: status_name(place.status),
            status_label: place.status.label().to_string(),
            created_at: place.created_at,
            updated_at: place.updated_at,
        }
    }
}

fn status_name(status: moodmap::models::PlaceStatus) -> String {
    serde_json::to_value(status)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SummaryDto {
    pub id: String,
    pub place_id: String,
    pub summary: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AiSummary> for SummaryDto {
    fn from(summary: AiSummary) -> Self {
        Self {
            id: summary.id,
            place_id: summary.place_id,
            summary: summary.summary,
            created_at: summary.created_at,
            updated_at: summary.updated_at,
        }
    }
}

/// Place with tags and latest summary resolved
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlaceDetailDto {
    pub place: PlaceDto,
    pub emotions: Vec<TagDto>,
    pub location: Option<TagDto>,
    pub summary: Option<SummaryDto>,
}

impl From<PlaceView> for PlaceDetailDto {
    fn from(view: PlaceView) -> Self {
        Self {
            place: view.place.into(),
            emotions: tags(view.emotions),
            location: view.location.map(TagDto::from),
            summary: view.summary.map(SummaryDto::from),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlaceListResponse {
    pub items: Vec<PlaceDetailDto>,
    pub total: usize,
    pub page: usize,
    pub size: usize,
}

impl From<Page<PlaceView>> for PlaceListResponse {
    fn from(page: Page<PlaceView>) -> Self {
        Self {
            items: page.items.into_iter().map(PlaceDetailDto::from).collect(),
            total: page.total,
            page: page.page,
            size: page.size,
        }
    }
}

/// Place listing filters and paging
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PlaceListParams {
    pub page: Option<usize>,
    pub size: Option<usize>,
    pub location_id: Option<String>,
    pub emotion_id: Option<String>,
    /// operating, closed or moved
    pub status: Option<String>,
    /// Substring of the place name
    pub q: Option<String>,
}

/// Request to enter a place by hand
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePlaceRequest {
    pub name: String,
    pub address: String,
    pub google_place_id: Option<String>,
    /// Derived from the address when absent
    pub location_id: Option<String>,
    #[serde(default)]
    pub emotion_ids: Vec<String>,
    pub image_url: Option<String>,
    pub google_rating: Option<f64>,
    /// operating, closed or moved
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlaceStatusRequest {
    /// operating, closed or moved (Korean labels are accepted too)
    pub status: String,
}

/// Saved place with its snapshot
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SavedPlaceDto {
    pub id: String,
    pub user_id: String,
    pub place_id: String,
    /// 1 = similar to a closed store, 2 = inference
    pub rec: u8,
    pub summary_snapshot: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place: Option<PlaceDto>,
}

impl From<SavedPlace> for SavedPlaceDto {
    fn from(saved: SavedPlace) -> Self {
        Self {
            id: saved.id,
            user_id: saved.user_id,
            place_id: saved.place_id,
            rec: saved.rec.into(),
            summary_snapshot: saved.summary_snapshot,
            created_at: saved.created_at,
            place: None,
        }
    }
}

impl From<SavedPlaceView> for SavedPlaceDto {
    fn from(view: SavedPlaceView) -> Self {
        Self {
            place: Some(view.place.into()),
            ..Self::from(view.saved)
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SavePlaceRequest {
    pub place_id: String,
    /// 1 = similar to a closed store, 2 = inference
    pub rec: u8,
}

// Recommendations

/// Place picked by a recommendation run
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecommendedPlaceDto {
    pub place: PlaceDto,
    pub rec: u8,
    pub emotions: Vec<TagDto>,
    pub location: Option<TagDto>,
    pub summary: Option<String>,
}

impl From<RecommendedPlace> for RecommendedPlaceDto {
    fn from(rec: RecommendedPlace) -> Self {
        Self {
            place: rec.place.into(),
            rec: rec.rec.into(),
            emotions: tags(rec.emotions),
            location: rec.location.map(TagDto::from),
            summary: rec.summary.map(|s| s.summary),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SimilarPlacesRequest {
    /// Name of the closed store
    pub name: String,
    pub address: String,
    /// Emotion names to tag the results with
    #[serde(default)]
    pub emotions: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClosedStoreRequest {
    pub closed_store_info: String,
    pub nearby_stores: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExpandEmotionsRequest {
    /// Emotion names
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PromptRequest {
    pub prompt: String,
}

/// Free-form LLM text
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TextResponse {
    pub response: String,
}

// Inference

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InferenceSessionRequest {
    pub location_ids: Vec<String>,
    /// One to three emotion ids
    pub emotion_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionDto {
    pub id: String,
    pub user_id: Option<String>,
    pub location_ids: Vec<String>,
    pub emotion_ids: Vec<String>,
    pub overall_recommendation: String,
    pub created_at: DateTime<Utc>,
}

impl From<InferenceSession> for SessionDto {
    fn from(session: InferenceSession) -> Self {
        Self {
            id: session.id,
            user_id: session.user_id,
            location_ids: session.location_ids,
            emotion_ids: session.emotion_ids,
            overall_recommendation: session.overall_recommendation,
            created_at: session.created_at,
        }
    }
}

/// Stored session with the places it recommended
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InferenceResponse {
    pub session: SessionDto,
    pub places: Vec<RecommendedPlaceDto>,
}

impl From<InferenceOutcome> for InferenceResponse {
    fn from(outcome: InferenceOutcome) -> Self {
        Self {
            session: outcome.session.into(),
            places: outcome
                .places
                .into_iter()
                .map(RecommendedPlaceDto::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionEntryDto {
    pub rank: u32,
    pub summary: String,
    pub emotion_tags: Vec<String>,
    pub place: PlaceDto,
}

impl From<SessionEntry> for SessionEntryDto {
    fn from(entry: SessionEntry) -> Self {
        Self {
            rank: entry.recommendation.rank,
            summary: entry.recommendation.summary,
            emotion_tags: entry.recommendation.emotion_tags,
            place: entry.place.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionDetailDto {
    pub session: SessionDto,
    pub locations: Vec<TagDto>,
    pub emotions: Vec<TagDto>,
    pub recommendations: Vec<SessionEntryDto>,
}

impl From<SessionDetail> for SessionDetailDto {
    fn from(detail: SessionDetail) -> Self {
        Self {
            session: detail.session.into(),
            locations: tags(detail.locations),
            emotions: tags(detail.emotions),
            recommendations: detail
                .recommendations
                .into_iter()
                .map(SessionEntryDto::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionListResponse {
    pub items: Vec<SessionDto>,
    pub total: usize,
    pub page: usize,
    pub size: usize,
}

impl From<Page<InferenceSession>> for SessionListResponse {
    fn from(page: Page<InferenceSession>) -> Self {
        Self {
            items: page.items.into_iter().map(SessionDto::from).collect(),
            total: page.total,
            page: page.page,
            size: page.size,
        }
    }
}

// Search

#[derive(Debug, Deserialize, IntoParams)]
pub struct StoreSearchParams {
    /// Free text, e.g. a store name with its neighbourhood
    pub q: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StoreCardDto {
    pub google_place_id: String,
    pub name: String,
    pub address: String,
    pub status: String,
    pub status_label: String,
    pub rating: Option<f64>,
    pub photo_url: Option<String>,
    pub summary_card: String,
    pub emotion_tags: Vec<String>,
}

impl From<StoreCard> for StoreCardDto {
    fn from(card: StoreCard) -> Self {
        Self {
            google_place_id: card.google_place_id,
            name: card.name,
            address: card.address,
            status: status_name(card.status),
            status_label: card.status_label,
            rating: card.rating,
            photo_url: card.photo_url,
            summary_card: card.summary_card,
            emotion_tags: card.emotion_tags,
        }
    }
}

// Mypage

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MyPageDto {
    pub user: ProfileDto,
    pub bookmarks: Vec<BookmarkDto>,
    pub saved_places: Vec<SavedPlaceDto>,
}

impl From<MyPage> for MyPageDto {
    fn from(page: MyPage) -> Self {
        Self {
            user: page.user.into(),
            bookmarks: page.bookmarks.into_iter().map(BookmarkDto::from).collect(),
            saved_places: page
                .saved_places
                .into_iter()
                .map(SavedPlaceDto::from)
                .collect(),
        }
    }
}

// Metrics

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CacheStatsDto {
    pub enabled: bool,
    pub size: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

impl From<CacheStats> for CacheStatsDto {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            enabled: stats.enabled,
            size: stats.size,
            capacity: stats.capacity,
            hits: stats.hits,
            misses: stats.misses,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiStatsDto {
    pub api: String,
    pub total_calls: u64,
    pub total_time_ms: f64,
    pub avg_time_ms: f64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub failures: u64,
}

impl From<ApiStatsSnapshot> for ApiStatsDto {
    fn from(s: ApiStatsSnapshot) -> Self {
        Self {
            api: s.api,
            total_calls: s.total_calls,
            total_time_ms: s.total_time_ms,
            avg_time_ms: s.avg_time_ms,
            cache_hits: s.cache_hits,
            cache_misses: s.cache_misses,
            failures: s.failures,
        }
    }
}

/// Response cache and external API statistics
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExternalMetricsDto {
    pub cache: CacheStatsDto,
    pub apis: Vec<ApiStatsDto>,
}
