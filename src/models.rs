use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CreateMovie {
    pub mov_title: Option<String>,
    #[serde(alias = "mov_year")]
    pub mov_release: Option<String>,
    pub mov_language: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CreateActor {
    pub act_firstname: Option<String>,
    pub act_lastname: Option<String>,
    pub act_language: Option<String>,
    pub act_gender: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RenameMovie {
    #[serde(rename = "newTitle")]
    pub new_title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CastRoleQuery {
    pub cas_role: Option<String>,
}

/// Form body of `POST /cast/create`; ids arrive as text.
#[derive(Debug, Deserialize)]
pub struct CreateCastForm {
    pub mov_id: Option<String>,
    pub act_id: Option<String>,
    pub cas_role: Option<String>,
}

/// One row of a movie's cast list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CastMember {
    pub act_id: i32,
    pub act_firstname: String,
    pub act_lastname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cas_role: Option<String>,
}

/// One movie an actor appears in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ActorCredit {
    pub mov_id: i32,
    pub mov_title: String,
    pub mov_release: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cas_role: Option<String>,
}
