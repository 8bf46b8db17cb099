use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, NotSet,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info};

use crate::{
    entities::{actor, cast, movie},
    error::{CatalogError, CatalogResult, Missing},
    models::{ActorCredit, CastMember, CreateActor, CreateMovie},
};

pub const MISSING_MOVIE_FIELDS: &str =
    "Mandatory value for either movie title or release year is missing.";
pub const MISSING_ACTOR_FIELDS: &str = "Invalid request data in Actors";

/// Movies, actors and their cast entries, backed by one database handle.
///
/// Every mutation runs inside its own transaction. A transaction that is
/// dropped without `commit` is rolled back, so each early `return` or `?`
/// leaves the database untouched.
#[derive(Clone)]
pub struct Catalog {
    db: DatabaseConnection,
}

impl Catalog {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn close(self) -> CatalogResult<()> {
        self.db.close().await?;
        Ok(())
    }

    pub async fn create_movie(&self, req: CreateMovie) -> CatalogResult<movie::Model> {
        let (Some(title), Some(release)) = (present(req.mov_title), present(req.mov_release))
        else {
            return Err(CatalogError::Validation(MISSING_MOVIE_FIELDS.to_string()));
        };
        if release.chars().count() != 4 {
            return Err(CatalogError::Validation(
                "Release year must be exactly 4 characters.".to_string(),
            ));
        }
        let language = present(req.mov_language);
        if language.as_ref().is_some_and(|l| l.chars().count() != 2) {
            return Err(CatalogError::Validation(
                "Language must be a 2-character code.".to_string(),
            ));
        }

        let txn = self.db.begin().await?;
        let movie = movie::ActiveModel {
            mov_id: NotSet,
            mov_title: Set(title),
            mov_release: Set(release),
            mov_language: Set(language),
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        debug!(mov_id = movie.mov_id, title = %movie.mov_title, "movie created");
        Ok(movie)
    }

    pub async fn get_movie(&self, mov_id: i32) -> CatalogResult<movie::Model> {
        movie::Entity::find_by_id(mov_id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::NotFound(Missing::Movie))
    }

    pub async fn list_movies(&self) -> CatalogResult<Vec<movie::Model>> {
        Ok(movie::Entity::find().order_by_asc(movie::Column::MovId).all(&self.db).await?)
    }

    /// Deletes the movie and every cast entry that references it.
    pub async fn delete_movie(&self, mov_id: i32) -> CatalogResult<()> {
        let txn = self.db.begin().await?;
        let Some(movie) = movie::Entity::find_by_id(mov_id).one(&txn).await? else {
            return Err(CatalogError::NotFound(Missing::Movie));
        };

        let removed = cast::Entity::delete_many()
            .filter(cast::Column::MovId.eq(mov_id))
            .exec(&txn)
            .await?;
        movie.delete(&txn).await?;
        txn.commit().await?;

        info!(mov_id, cast_removed = removed.rows_affected, "movie deleted");
        Ok(())
    }

    pub async fn rename_movie(&self, mov_id: i32, new_title: Option<String>) -> CatalogResult<()> {
        let Some(new_title) = present(new_title) else {
            return Err(CatalogError::Validation("Movie title must not be empty.".to_string()));
        };

        let txn = self.db.begin().await?;
        let Some(movie) = movie::Entity::find_by_id(mov_id).one(&txn).await? else {
            return Err(CatalogError::NotFound(Missing::Movie));
        };

        let mut active: movie::ActiveModel = movie.into();
        active.mov_title = Set(new_title);
        active.update(&txn).await?;
        txn.commit().await?;

        debug!(mov_id, "movie renamed");
        Ok(())
    }

    pub async fn create_actor(&self, req: CreateActor) -> CatalogResult<actor::Model> {
        let (Some(first), Some(last)) = (present(req.act_firstname), present(req.act_lastname))
        else {
            return Err(CatalogError::Validation(MISSING_ACTOR_FIELDS.to_string()));
        };

        let txn = self.db.begin().await?;
        let actor = actor::ActiveModel {
            act_id: NotSet,
            act_firstname: Set(first),
            act_lastname: Set(last),
            act_language: Set(present(req.act_language)),
            act_gender: Set(present(req.act_gender)),
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        debug!(act_id = actor.act_id, "actor created");
        Ok(actor)
    }

    pub async fn get_actor(&self, act_id: i32) -> CatalogResult<actor::Model> {
        actor::Entity::find_by_id(act_id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::NotFound(Missing::Actor))
    }

    pub async fn list_actors(&self) -> CatalogResult<Vec<actor::Model>> {
        Ok(actor::Entity::find().order_by_asc(actor::Column::ActId).all(&self.db).await?)
    }

    /// Deletes the actor and, like movie deletion, every cast entry naming them.
    pub async fn delete_actor(&self, act_id: i32) -> CatalogResult<()> {
        let txn = self.db.begin().await?;
        let Some(actor) = actor::Entity::find_by_id(act_id).one(&txn).await? else {
            return Err(CatalogError::NotFound(Missing::Actor));
        };

        let removed = cast::Entity::delete_many()
            .filter(cast::Column::ActId.eq(act_id))
            .exec(&txn)
            .await?;
        actor.delete(&txn).await?;
        txn.commit().await?;

        info!(act_id, cast_removed = removed.rows_affected, "actor deleted");
        Ok(())
    }

    /// The lookup before the insert only produces a friendlier early exit;
    /// the unique index on (mov_id, act_id) decides concurrent races.
    pub async fn assign_actor_to_cast(
        &self,
        mov_id: i32,
        act_id: i32,
        role: Option<String>,
    ) -> CatalogResult<cast::Model> {
        let txn = self.db.begin().await?;
        let movie = movie::Entity::find_by_id(mov_id).one(&txn).await?;
        let actor = actor::Entity::find_by_id(act_id).one(&txn).await?;
        if movie.is_none() || actor.is_none() {
            return Err(CatalogError::NotFound(Missing::MovieOrActor));
        }

        let existing = cast::Entity::find()
            .filter(cast::Column::MovId.eq(mov_id))
            .filter(cast::Column::ActId.eq(act_id))
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Err(CatalogError::Conflict);
        }

        let entry = cast::ActiveModel {
            cas_id: NotSet,
            mov_id: Set(mov_id),
            act_id: Set(act_id),
            cas_role: Set(present(role)),
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        debug!(mov_id, act_id, cas_id = entry.cas_id, "actor added to cast");
        Ok(entry)
    }

    pub async fn remove_actor_from_cast(&self, mov_id: i32, act_id: i32) -> CatalogResult<()> {
        let txn = self.db.begin().await?;
        let movie = movie::Entity::find_by_id(mov_id).one(&txn).await?;
        let actor = actor::Entity::find_by_id(act_id).one(&txn).await?;
        if movie.is_none() || actor.is_none() {
            return Err(CatalogError::NotFound(Missing::MovieOrActor));
        }

        let Some(entry) = cast::Entity::find()
            .filter(cast::Column::MovId.eq(mov_id))
            .filter(cast::Column::ActId.eq(act_id))
            .one(&txn)
            .await?
        else {
            return Err(CatalogError::NotFound(Missing::CastEntry));
        };

        entry.delete(&txn).await?;
        txn.commit().await?;

        debug!(mov_id, act_id, "actor removed from cast");
        Ok(())
    }

    pub async fn get_cast_for_movie(&self, mov_id: i32) -> CatalogResult<Vec<CastMember>> {
        self.get_movie(mov_id).await?;

        let rows = cast::Entity::find()
            .filter(cast::Column::MovId.eq(mov_id))
            .order_by_asc(cast::Column::CasId)
            .find_also_related(actor::Entity)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(entry, actor)| {
                let actor = actor?;
                Some(CastMember {
                    act_id: actor.act_id,
                    act_firstname: actor.act_firstname,
                    act_lastname: actor.act_lastname,
                    cas_role: entry.cas_role,
                })
            })
            .collect())
    }

    pub async fn get_movies_for_actor(&self, act_id: i32) -> CatalogResult<Vec<ActorCredit>> {
        self.get_actor(act_id).await?;

        let rows = cast::Entity::find()
            .filter(cast::Column::ActId.eq(act_id))
            .order_by_asc(cast::Column::CasId)
            .find_also_related(movie::Entity)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(entry, movie)| {
                let movie = movie?;
                Some(ActorCredit {
                    mov_id: movie.mov_id,
                    mov_title: movie.mov_title,
                    mov_release: movie.mov_release,
                    cas_role: entry.cas_role,
                })
            })
            .collect())
    }

    pub async fn casts_by_actor(&self, act_id: i32) -> CatalogResult<Vec<cast::Model>> {
        self.get_actor(act_id).await?;

        Ok(cast::Entity::find()
            .filter(cast::Column::ActId.eq(act_id))
            .order_by_asc(cast::Column::CasId)
            .all(&self.db)
            .await?)
    }
}

/// Absent and empty strings are both treated as "not provided".
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
pub(crate) mod tests {
    use sea_orm::ConnectionTrait;

    use super::*;
    use crate::db;

    pub(crate) async fn memory_catalog() -> Catalog {
        let db = db::connect_and_migrate("sqlite::memory:").await.unwrap();
        Catalog::new(db)
    }

    /// Makes every movie delete fail inside the database.
    pub(crate) async fn refuse_movie_deletes(catalog: &Catalog) {
        catalog
            .db
            .execute_unprepared(
                "CREATE TRIGGER refuse_movie_delete BEFORE DELETE ON movies \
                 BEGIN SELECT RAISE(ABORT, 'movie deletes disabled'); END",
            )
            .await
            .unwrap();
    }

    fn inception() -> CreateMovie {
        CreateMovie {
            mov_title: Some("Inception".to_string()),
            mov_release: Some("2010".to_string()),
            mov_language: Some("en".to_string()),
        }
    }

    fn actor(first: &str, last: &str) -> CreateActor {
        CreateActor {
            act_firstname: Some(first.to_string()),
            act_lastname: Some(last.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_movie_round_trip() {
        let catalog = memory_catalog().await;

        let created = catalog.create_movie(inception()).await.unwrap();
        let stored = catalog.get_movie(created.mov_id).await.unwrap();

        assert_eq!(stored, created);
        assert_eq!(stored.mov_title, "Inception");
        assert_eq!(stored.mov_release, "2010");
        assert_eq!(stored.mov_language.as_deref(), Some("en"));
    }

    #[tokio::test]
    async fn test_create_movie_requires_title_and_year() {
        let catalog = memory_catalog().await;

        let no_title = CreateMovie { mov_title: None, ..inception() };
        let empty_year = CreateMovie { mov_release: Some(String::new()), ..inception() };

        for req in [no_title, empty_year] {
            let err = catalog.create_movie(req).await.unwrap_err();
            assert!(matches!(err, CatalogError::Validation(_)));
        }
        assert!(catalog.list_movies().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_movie_rejects_malformed_year_and_language() {
        let catalog = memory_catalog().await;

        let long_year = CreateMovie { mov_release: Some("20100".to_string()), ..inception() };
        let long_language = CreateMovie { mov_language: Some("eng".to_string()), ..inception() };

        for req in [long_year, long_language] {
            let err = catalog.create_movie(req).await.unwrap_err();
            assert!(matches!(err, CatalogError::Validation(_)));
        }

        let no_language = CreateMovie { mov_language: Some(String::new()), ..inception() };
        let movie = catalog.create_movie(no_language).await.unwrap();
        assert_eq!(movie.mov_language, None);
    }

    #[tokio::test]
    async fn test_rename_movie() {
        let catalog = memory_catalog().await;
        let movie = catalog.create_movie(inception()).await.unwrap();

        catalog.rename_movie(movie.mov_id, Some("Origin".to_string())).await.unwrap();
        assert_eq!(catalog.get_movie(movie.mov_id).await.unwrap().mov_title, "Origin");

        let err = catalog.rename_movie(movie.mov_id, Some(String::new())).await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));

        let err = catalog.rename_movie(999, Some("Nope".to_string())).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(Missing::Movie)));
    }

    #[tokio::test]
    async fn test_delete_movie_cascades_to_cast() {
        let catalog = memory_catalog().await;
        let movie = catalog.create_movie(inception()).await.unwrap();
        let other = catalog
            .create_movie(CreateMovie {
                mov_title: Some("The Revenant".to_string()),
                mov_release: Some("2015".to_string()),
                mov_language: None,
            })
            .await
            .unwrap();
        let leo = catalog.create_actor(actor("Leonardo", "DiCaprio")).await.unwrap();
        let tom = catalog.create_actor(actor("Tom", "Hardy")).await.unwrap();

        catalog.assign_actor_to_cast(movie.mov_id, leo.act_id, None).await.unwrap();
        catalog.assign_actor_to_cast(movie.mov_id, tom.act_id, None).await.unwrap();
        catalog.assign_actor_to_cast(other.mov_id, leo.act_id, None).await.unwrap();

        catalog.delete_movie(movie.mov_id).await.unwrap();

        assert!(matches!(
            catalog.get_cast_for_movie(movie.mov_id).await.unwrap_err(),
            CatalogError::NotFound(Missing::Movie)
        ));
        let remaining = catalog.casts_by_actor(leo.act_id).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].mov_id, other.mov_id);
        assert!(catalog.casts_by_actor(tom.act_id).await.unwrap().is_empty());

        let err = catalog.delete_movie(movie.mov_id).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(Missing::Movie)));
    }

    #[tokio::test]
    async fn test_delete_actor_cascades_to_cast() {
        let catalog = memory_catalog().await;
        let movie = catalog.create_movie(inception()).await.unwrap();
        let leo = catalog.create_actor(actor("Leonardo", "DiCaprio")).await.unwrap();
        catalog.assign_actor_to_cast(movie.mov_id, leo.act_id, None).await.unwrap();

        catalog.delete_actor(leo.act_id).await.unwrap();

        assert!(catalog.get_cast_for_movie(movie.mov_id).await.unwrap().is_empty());
        assert!(catalog.list_actors().await.unwrap().is_empty());
        assert!(matches!(
            catalog.delete_actor(leo.act_id).await.unwrap_err(),
            CatalogError::NotFound(Missing::Actor)
        ));
    }

    #[tokio::test]
    async fn test_create_actor_requires_names() {
        let catalog = memory_catalog().await;

        let err = catalog
            .create_actor(CreateActor { act_firstname: Some("Leonardo".to_string()), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));

        let created = catalog
            .create_actor(CreateActor {
                act_gender: Some("M".to_string()),
                ..actor("Leonardo", "DiCaprio")
            })
            .await
            .unwrap();
        assert_eq!(catalog.get_actor(created.act_id).await.unwrap(), created);
        assert_eq!(created.act_gender.as_deref(), Some("M"));
        assert_eq!(created.act_language, None);
    }

    #[tokio::test]
    async fn test_assign_twice_conflicts() {
        let catalog = memory_catalog().await;
        let movie = catalog.create_movie(inception()).await.unwrap();
        let leo = catalog.create_actor(actor("Leonardo", "DiCaprio")).await.unwrap();

        catalog
            .assign_actor_to_cast(movie.mov_id, leo.act_id, Some("Cobb".to_string()))
            .await
            .unwrap();
        let err = catalog
            .assign_actor_to_cast(movie.mov_id, leo.act_id, Some("Dom".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::Conflict));
        assert_eq!(catalog.get_cast_for_movie(movie.mov_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unique_index_rejects_duplicate_pair() {
        let catalog = memory_catalog().await;
        let movie = catalog.create_movie(inception()).await.unwrap();
        let leo = catalog.create_actor(actor("Leonardo", "DiCaprio")).await.unwrap();
        catalog.assign_actor_to_cast(movie.mov_id, leo.act_id, None).await.unwrap();

        // Bypass the advisory lookup and hit the constraint directly.
        let err = cast::ActiveModel {
            cas_id: NotSet,
            mov_id: Set(movie.mov_id),
            act_id: Set(leo.act_id),
            cas_role: Set(None),
        }
        .insert(&catalog.db)
        .await
        .unwrap_err();

        assert!(matches!(CatalogError::from(err), CatalogError::Conflict));
    }

    #[tokio::test]
    async fn test_assign_requires_movie_and_actor() {
        let catalog = memory_catalog().await;
        let movie = catalog.create_movie(inception()).await.unwrap();

        let err = catalog.assign_actor_to_cast(movie.mov_id, 42, None).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(Missing::MovieOrActor)));
    }

    #[tokio::test]
    async fn test_remove_missing_pairing_is_not_found() {
        let catalog = memory_catalog().await;
        let movie = catalog.create_movie(inception()).await.unwrap();
        let leo = catalog.create_actor(actor("Leonardo", "DiCaprio")).await.unwrap();

        let err = catalog.remove_actor_from_cast(movie.mov_id, leo.act_id).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(Missing::CastEntry)));

        let err = catalog.remove_actor_from_cast(999, leo.act_id).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(Missing::MovieOrActor)));

        catalog.assign_actor_to_cast(movie.mov_id, leo.act_id, None).await.unwrap();
        catalog.remove_actor_from_cast(movie.mov_id, leo.act_id).await.unwrap();
        assert!(catalog.get_cast_for_movie(movie.mov_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cast_lookups() {
        let catalog = memory_catalog().await;
        let movie = catalog.create_movie(inception()).await.unwrap();
        let leo = catalog.create_actor(actor("Leonardo", "DiCaprio")).await.unwrap();
        let elliot = catalog.create_actor(actor("Elliot", "Page")).await.unwrap();
        catalog
            .assign_actor_to_cast(movie.mov_id, leo.act_id, Some("Cobb".to_string()))
            .await
            .unwrap();
        catalog.assign_actor_to_cast(movie.mov_id, elliot.act_id, None).await.unwrap();

        let members = catalog.get_cast_for_movie(movie.mov_id).await.unwrap();
        assert_eq!(
            members,
            vec![
                CastMember {
                    act_id: leo.act_id,
                    act_firstname: "Leonardo".to_string(),
                    act_lastname: "DiCaprio".to_string(),
                    cas_role: Some("Cobb".to_string()),
                },
                CastMember {
                    act_id: elliot.act_id,
                    act_firstname: "Elliot".to_string(),
                    act_lastname: "Page".to_string(),
                    cas_role: None,
                },
            ]
        );

        let credits = catalog.get_movies_for_actor(leo.act_id).await.unwrap();
        assert_eq!(credits.len(), 1);
        assert_eq!(credits[0].mov_title, "Inception");
        assert_eq!(credits[0].cas_role.as_deref(), Some("Cobb"));

        assert!(matches!(
            catalog.get_movies_for_actor(999).await.unwrap_err(),
            CatalogError::NotFound(Missing::Actor)
        ));
    }

    #[tokio::test]
    async fn test_failed_delete_rolls_back_cast_removal() {
        let catalog = memory_catalog().await;
        let movie = catalog.create_movie(inception()).await.unwrap();
        let leo = catalog.create_actor(actor("Leonardo", "DiCaprio")).await.unwrap();
        catalog.assign_actor_to_cast(movie.mov_id, leo.act_id, None).await.unwrap();
        refuse_movie_deletes(&catalog).await;

        let err = catalog.delete_movie(movie.mov_id).await.unwrap_err();
        assert!(matches!(err, CatalogError::Persistence(_)));

        assert_eq!(catalog.get_movie(movie.mov_id).await.unwrap(), movie);
        let members = catalog.get_cast_for_movie(movie.mov_id).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].act_id, leo.act_id);
    }
}
