use std::collections::HashSet;

use super::{prelude::*, refresh_place_stats};
use crate::util::validate::{dedup_ids, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAxisScore {
    pub code: String,
    pub score: i64,
}

/// A review as submitted by its author.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub place_id       : String,
    pub overall        : i64,
    pub age_band_id    : Option<String>,
    pub stay_minutes   : Option<i64>,
    pub revisit_intent : Option<i64>,
    pub text           : String,
    pub axes           : Vec<NewAxisScore>,
    pub photo_ids      : Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Storable {
    review: Review,
    scores: Vec<ReviewScore>,
    photo_ids: Vec<Id>,
}

impl Storable {
    pub fn review_id(&self) -> &Id {
        &self.review.id
    }
    pub fn place_id(&self) -> &Id {
        &self.review.place_id
    }
}

struct ValidPayload {
    overall: RatingValue,
    stay_minutes: Option<u32>,
    revisit_intent: Option<RatingValue>,
    axes: Vec<(String, RatingValue)>,
}

/// Checks the submitted values without accessing any
/// stored data and reports all offending fields at once.
fn validate_payload(r: &NewReview) -> std::result::Result<ValidPayload, ValidationError> {
    let mut err = ValidationError::new("Invalid review");

    let overall = RatingValue::try_new(r.overall);
    if overall.is_none() {
        err.add("overall", "must be between 1 and 5");
    }
    let revisit_intent = r.revisit_intent.map(RatingValue::try_new);
    if let Some(None) = revisit_intent {
        err.add("revisit_intent", "must be between 1 and 5");
    }
    let stay_minutes = r.stay_minutes.map(|m| u32::try_from(m).ok());
    if let Some(None) = stay_minutes {
        err.add("stay_minutes", "must not be negative");
    }

    if r.axes.is_empty() {
        err.add("axes", "at least one axis score is required");
    }
    let mut seen = HashSet::with_capacity(r.axes.len());
    let mut axes = Vec::with_capacity(r.axes.len());
    for NewAxisScore { code, score } in &r.axes {
        let code = code.trim();
        if !seen.insert(code) {
            err.add("axes", format!("duplicate axis {code}"));
            continue;
        }
        match RatingValue::try_new(*score) {
            Some(score) => axes.push((code.to_owned(), score)),
            None => err.add("axes", format!("score of {code} must be between 1 and 5")),
        }
    }

    match (overall, err.is_empty()) {
        (Some(overall), true) => Ok(ValidPayload {
            overall,
            stay_minutes: stay_minutes.flatten(),
            revisit_intent: revisit_intent.flatten(),
            axes,
        }),
        _ => Err(err),
    }
}

/// Validates a new review and resolves all references.
///
/// The photos are locked as a side effect, i.e. this must be
/// invoked within the same write transaction as [`store_new_review`].
pub fn prepare_new_review<R>(repo: &R, author_id: &Id, r: NewReview) -> Result<Storable>
where
    R: PlaceRepo + ReferenceRepo + PhotoRepo,
{
    let payload = validate_payload(&r)?;

    let place = repo.get_place(r.place_id.trim())?;

    let age_band_id = match r.age_band_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => match repo.get_age_band(id) {
            Ok(age_band) => Some(age_band.id),
            Err(RepoError::NotFound) => {
                return Err(ValidationError::field("age_band_id", "is unknown").into());
            }
            Err(err) => return Err(err.into()),
        },
        _ => None,
    };

    let codes: Vec<_> = payload.axes.iter().map(|(code, _)| code.as_str()).collect();
    let known_axes = repo.review_axes_by_codes(&codes)?;
    let unknown_codes: Vec<_> = codes
        .iter()
        .filter(|code| !known_axes.iter().any(|axis| axis.code == **code))
        .collect();
    if !unknown_codes.is_empty() {
        let mut err = ValidationError::new("Unknown review axes");
        for code in unknown_codes {
            err.add("axes", *code);
        }
        return Err(err.into());
    }

    let photo_ids = dedup_ids(&r.photo_ids);
    if !photo_ids.is_empty() {
        let ids: Vec<_> = photo_ids.iter().map(String::as_str).collect();
        let attachable = repo.lock_attachable_review_photos(author_id.as_str(), &ids)?;
        debug_assert!(attachable.iter().all(|p| p.is_attachable_by(author_id)));
        if attachable.len() < ids.len() {
            let mut err = ValidationError::new("Photos are not available for attachment");
            for id in &photo_ids {
                err.add("photo_ids", id.as_str());
            }
            return Err(err.into());
        }
    }

    let now = Timestamp::now();
    let review = Review {
        id: Id::new(),
        place_id: place.id,
        author_id: author_id.clone(),
        overall: payload.overall,
        age_band_id,
        stay_minutes: payload.stay_minutes,
        revisit_intent: payload.revisit_intent,
        text: r.text,
        status: ReviewStatus::Public,
        created_at: now,
        updated_at: now,
    };
    let scores = payload
        .axes
        .into_iter()
        .filter_map(|(code, score)| {
            known_axes
                .iter()
                .find(|axis| axis.code == code)
                .map(|axis| ReviewScore {
                    review_id: review.id.clone(),
                    axis_id: axis.id.clone(),
                    score,
                })
        })
        .collect();
    Ok(Storable {
        review,
        scores,
        photo_ids: photo_ids.into_iter().map(Id::from).collect(),
    })
}

/// Stores a prepared review with its scores, attaches the photos
/// and refreshes the statistics of the place.
pub fn store_new_review<R>(repo: &R, s: Storable) -> Result<Id>
where
    R: ReviewRepo + PhotoRepo + PlaceStatsRepo,
{
    let Storable {
        review,
        scores,
        photo_ids,
    } = s;
    debug_assert!(scores.iter().all(|s| s.review_id == review.id));
    repo.create_review(&review)?;
    repo.create_review_scores(&scores)?;
    if !photo_ids.is_empty() {
        let ids: Vec<_> = photo_ids.iter().map(Id::as_str).collect();
        let attached =
            repo.attach_photos_to_review(&ids, review.id.as_str(), review.place_id.as_str())?;
        if attached != ids.len() {
            log::warn!(
                "Attached only {attached} of {} photos to review {}",
                ids.len(),
                review.id
            );
            return Err(Error::Conflict);
        }
    }
    refresh_place_stats(repo, review.place_id.as_str())?;
    Ok(review.id)
}
