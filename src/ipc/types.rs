use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Display identity for the document header. Presentation only; the data
/// and auth collaborators own everything else about the signed-in teacher.
#[derive(Debug, Clone)]
pub struct TeacherIdentity {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl TeacherIdentity {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Default)]
pub struct AppState {
    pub teacher: Option<TeacherIdentity>,
}
