use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 具有唯一識別碼的實體（用於去重）
pub trait Identified {
    fn id(&self) -> &str;
}

/// 後端可能同時回傳 `_id` 與 `id`（virtuals），以 `id` 為準
mod record_id {
    use serde::de::Error;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    struct Keys {
        #[serde(default)]
        id: Option<String>,
        #[serde(rename = "_id", default)]
        mongo_id: Option<String>,
    }

    pub fn serialize<S: Serializer>(id: &str, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("id", id)?;
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        let keys = Keys::deserialize(deserializer)?;
        keys.id
            .or(keys.mongo_id)
            .ok_or_else(|| D::Error::missing_field("id"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetStatus {
    #[default]
    Available,
    Pending,
    Adopted,
    #[serde(other)]
    Unknown,
}

impl PetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PetStatus::Available => "available",
            PetStatus::Pending => "pending",
            PetStatus::Adopted => "adopted",
            PetStatus::Unknown => "unknown",
        }
    }
}

impl std::str::FromStr for PetStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "available" => Ok(PetStatus::Available),
            "pending" => Ok(PetStatus::Pending),
            "adopted" => Ok(PetStatus::Adopted),
            other => Err(format!("unknown pet status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    #[serde(flatten, with = "record_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub species: String,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub status: PetStatus,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub owner: Option<Value>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Identified for Pet {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(flatten, with = "record_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Identified for User {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(flatten, with = "record_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub member_count: u64,
    #[serde(default)]
    pub is_member: bool,
    #[serde(default)]
    pub owner: Option<Value>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Identified for Group {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(flatten, with = "record_id")]
    pub id: String,
    #[serde(default)]
    pub author: Option<Value>,
    pub content: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Post {
    /// 作者可能是展開的物件或只是 id
    pub fn author_name(&self) -> Option<&str> {
        match self.author.as_ref()? {
            Value::Object(obj) => obj.get("name").and_then(Value::as_str),
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl Identified for Post {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    #[serde(alias = "pets", alias = "groups", alias = "users", alias = "items")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "first_page")]
    pub pages: u32,
}

fn first_page() -> u32 {
    1
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            pages: 1,
        }
    }
}

/// 精選清單可能回傳陣列，也可能包在 `pets` 欄位內
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Bare(Vec<T>),
    Wrapped {
        #[serde(
            alias = "pets",
            alias = "groups",
            alias = "users",
            alias = "posts",
            alias = "members"
        )]
        items: Vec<T>,
    },
}

impl<T> Listing<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Bare(items) | Listing::Wrapped { items } => items,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PetFilters {
    pub species: Option<String>,
    pub breed: Option<String>,
    pub gender: Option<String>,
    pub size: Option<String>,
    pub age_min: Option<u32>,
    pub age_max: Option<u32>,
    pub location: Option<String>,
    pub status: Option<PetStatus>,
    pub sort: Option<String>,
    pub search: Option<String>,
}

impl PetFilters {
    /// 轉成查詢參數，略過空白欄位
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        let text_fields = [
            ("species", &self.species),
            ("breed", &self.breed),
            ("gender", &self.gender),
            ("size", &self.size),
            ("location", &self.location),
            ("sort", &self.sort),
            ("search", &self.search),
        ];
        for (key, value) in text_fields {
            if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                query.push((key, v.to_string()));
            }
        }
        if let Some(min) = self.age_min {
            query.push(("ageMin", min.to_string()));
        }
        if let Some(max) = self.age_max {
            query.push(("ageMax", max.to_string()));
        }
        if let Some(status) = self.status {
            query.push(("status", status.as_str().to_string()));
        }
        query
    }

    pub fn is_empty(&self) -> bool {
        self.to_query().is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatus {
    pub is_liked: bool,
    #[serde(default)]
    pub like_count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PetStats {
    pub total_pets: u64,
    pub available: u64,
    pub pending: u64,
    pub adopted: u64,
    pub new_this_week: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CountBucket {
    #[serde(alias = "_id")]
    pub name: String,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Insights {
    pub popular_species: Vec<CountBucket>,
    pub popular_breeds: Vec<CountBucket>,
    pub average_adoption_days: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminStats {
    pub total_users: u64,
    pub total_pets: u64,
    pub total_groups: u64,
    pub adopted_pets: u64,
    pub pending_pets: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadResponse {
    #[serde(alias = "imageUrl", alias = "path")]
    pub url: String,
}

/// 本機保存的登入狀態
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

impl Session {
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pet_accepts_mongo_id_and_keeps_unknown_fields() {
        let pet: Pet = serde_json::from_value(json!({
            "_id": "p1",
            "name": "Rex",
            "species": "dog",
            "status": "adopted",
            "isLiked": true,
            "likeCount": 4,
            "vaccinated": true
        }))
        .unwrap();

        assert_eq!(pet.id, "p1");
        assert_eq!(pet.status, PetStatus::Adopted);
        assert!(pet.is_liked);
        assert_eq!(pet.like_count, 4);
        assert_eq!(pet.extra.get("vaccinated"), Some(&json!(true)));
    }

    #[test]
    fn test_record_with_both_id_keys_parses() {
        let pet: Pet = serde_json::from_value(json!({
            "_id": "p1",
            "id": "p1",
            "name": "Rex",
            "species": "dog"
        }))
        .unwrap();
        assert_eq!(pet.id, "p1");
        assert!(pet.extra.is_empty());

        let page: Page<Pet> = serde_json::from_value(json!({
            "pets": [{"_id": "p1", "id": "p1", "name": "Rex"}, {"_id": "p2", "name": "Tom"}],
            "total": 2,
            "page": 1,
            "pages": 1
        }))
        .unwrap();
        let ids: Vec<&str> = page.items.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
    }

    #[test]
    fn test_record_without_id_is_rejected() {
        let result = serde_json::from_value::<Group>(json!({"name": "No id"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_user_serializes_plain_id() {
        let user: User = serde_json::from_value(json!({
            "_id": "u1",
            "name": "Ana",
            "email": "ana@example.com"
        }))
        .unwrap();
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["id"], json!("u1"));
        assert!(value.get("_id").is_none());

        let restored: User = serde_json::from_value(value).unwrap();
        assert_eq!(restored, user);
    }

    #[test]
    fn test_unknown_status_is_tolerated() {
        let pet: Pet =
            serde_json::from_value(json!({"id": "p2", "name": "Tom", "status": "fostered"}))
                .unwrap();
        assert_eq!(pet.status, PetStatus::Unknown);
    }

    #[test]
    fn test_page_accepts_resource_specific_key() {
        let page: Page<Group> = serde_json::from_value(json!({
            "groups": [{"_id": "g1", "name": "Cat people"}],
            "total": 1,
            "page": 1,
            "pages": 1
        }))
        .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, "g1");
    }

    #[test]
    fn test_listing_bare_and_wrapped() {
        let bare: Listing<Pet> =
            serde_json::from_value(json!([{"id": "a", "name": "A"}])).unwrap();
        let wrapped: Listing<Pet> =
            serde_json::from_value(json!({"pets": [{"id": "b", "name": "B"}]})).unwrap();
        assert_eq!(bare.into_vec()[0].id, "a");
        assert_eq!(wrapped.into_vec()[0].id, "b");
    }

    #[test]
    fn test_filters_skip_blank_fields() {
        let filters = PetFilters {
            species: Some("cat".to_string()),
            breed: Some("  ".to_string()),
            age_max: Some(3),
            status: Some(PetStatus::Available),
            ..Default::default()
        };
        let query = filters.to_query();
        assert_eq!(
            query,
            vec![
                ("species", "cat".to_string()),
                ("ageMax", "3".to_string()),
                ("status", "available".to_string()),
            ]
        );
        assert!(PetFilters::default().is_empty());
    }

    #[test]
    fn test_post_author_name() {
        let post: Post = serde_json::from_value(json!({
            "_id": "x",
            "content": "hello",
            "author": {"_id": "u1", "name": "Sam"}
        }))
        .unwrap();
        assert_eq!(post.author_name(), Some("Sam"));
    }
}
