// NOTE:
// All timestamps with the `_at` postfix are stored
// as unix timestamp in **milli**seconds.

///////////////////////////////////////////////////////////////////////
// Users
///////////////////////////////////////////////////////////////////////

table! {
    users (id) {
        id -> Text,
        email -> Text,
        nickname -> Nullable<Text>,
        created_at -> BigInt,
    }
}

///////////////////////////////////////////////////////////////////////
// Reference data
///////////////////////////////////////////////////////////////////////

table! {
    categories (id) {
        id -> Text,
        code -> Text,
        label -> Text,
        sort -> Integer,
    }
}

table! {
    features (id) {
        id -> Text,
        code -> Text,
        label -> Text,
        group_tag -> Nullable<Text>,
        description -> Nullable<Text>,
    }
}

table! {
    age_bands (id) {
        id -> Text,
        code -> Text,
        label -> Text,
        sort -> Integer,
    }
}

table! {
    review_axes (id) {
        id -> Text,
        code -> Text,
        label -> Text,
        sort -> Integer,
    }
}

///////////////////////////////////////////////////////////////////////
// Places
///////////////////////////////////////////////////////////////////////

table! {
    places (id) {
        id -> Text,
        name -> Text,
        kana -> Nullable<Text>,
        category_id -> Text,
        description -> Nullable<Text>,
        address -> Nullable<Text>,
        phone -> Nullable<Text>,
        website_url -> Nullable<Text>,
        price_range -> Nullable<Text>,
        opening_hours -> Nullable<Text>,
        lat -> Double,
        lng -> Double,
        external_id -> Nullable<Text>,
        data_source -> Text,
        manual_lock -> Bool,
        synced_at -> Nullable<BigInt>,
        // lower-case projection of the text fields for free-text search
        search_text -> Text,
        created_at -> BigInt,
        updated_at -> BigInt,
    }
}

joinable!(places -> categories (category_id));

table! {
    place_features (place_id, feature_id) {
        place_id -> Text,
        feature_id -> Text,
        value -> Nullable<SmallInt>,
        detail -> Nullable<Text>,
    }
}

joinable!(place_features -> places (place_id));
joinable!(place_features -> features (feature_id));

table! {
    place_stats (place_id) {
        place_id -> Text,
        avg_overall -> Nullable<Double>,
        review_count -> BigInt,
        photo_count -> BigInt,
        last_reviewed_at -> BigInt,
    }
}

joinable!(place_stats -> places (place_id));

///////////////////////////////////////////////////////////////////////
// Reviews
///////////////////////////////////////////////////////////////////////

table! {
    reviews (id) {
        id -> Text,
        place_id -> Text,
        user_id -> Text,
        overall -> SmallInt,
        age_band_id -> Nullable<Text>,
        stay_minutes -> Nullable<Integer>,
        revisit_intent -> Nullable<SmallInt>,
        text -> Text,
        status -> Text,
        created_at -> BigInt,
        updated_at -> BigInt,
    }
}

joinable!(reviews -> places (place_id));

table! {
    review_scores (review_id, axis_id) {
        review_id -> Text,
        axis_id -> Text,
        score -> SmallInt,
    }
}

joinable!(review_scores -> reviews (review_id));
joinable!(review_scores -> review_axes (axis_id));

///////////////////////////////////////////////////////////////////////
// Photos
///////////////////////////////////////////////////////////////////////

table! {
    photos (id) {
        id -> Text,
        purpose -> Text,
        storage_path -> Text,
        place_id -> Nullable<Text>,
        review_id -> Nullable<Text>,
        uploaded_by -> Text,
        mime_type -> Nullable<Text>,
        width -> Nullable<Integer>,
        height -> Nullable<Integer>,
        file_size -> Nullable<BigInt>,
        created_at -> BigInt,
    }
}

joinable!(photos -> reviews (review_id));

allow_tables_to_appear_in_same_query!(
    users,
    categories,
    features,
    age_bands,
    review_axes,
    places,
    place_features,
    place_stats,
    reviews,
    review_scores,
    photos,
);
