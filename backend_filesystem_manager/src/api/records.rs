// backend_filesystem_manager/src/api/records.rs
use rocket::http::Status;
use rocket::serde::{json::Json, Serialize};
use rocket::State;

use crate::auth::Admin;
use crate::content::ContentStore;

#[derive(Serialize, Debug)]
#[serde(crate = "rocket::serde")]
pub struct RecordLink {
    pub title: String,
    pub id: u64,
    pub link: String,
}

#[derive(Serialize, Debug)]
#[serde(crate = "rocket::serde")]
pub struct RecordGroup {
    pub contenttype: String,
    pub name: String,
    pub records: Vec<RecordLink>,
}

#[derive(Serialize, Debug)]
#[serde(crate = "rocket::serde")]
pub struct RecordBrowserContext {
    pub results: Vec<RecordGroup>,
}

// ------------- RECORD BROWSER -----------------------------------------------
/// Published records of every content type, for inserting links in the editor
/// ### Examples:
/// - GET /async/recordbrowser → `{"results":[{"contenttype":"pages","name":"Pages","records":[{"title":"About","id":1,"link":"/page/about"}]}]}`
#[get("/recordbrowser")]
pub async fn record_browser(
    store: &State<Box<dyn ContentStore>>,
    _admin: Admin,
) -> Result<Json<RecordBrowserContext>, Status> {
    let mut results = Vec::new();
    for contenttype in store.content_types().await {
        let records = store
            .published_records(&contenttype.slug)
            .await
            .map_err(|e| {
                error!("❌ {}", e);
                Status::InternalServerError
            })?;
        if records.is_empty() {
            continue;
        }

        let records = records
            .iter()
            .map(|record| RecordLink {
                title: contenttype.record_title(record),
                id: record.id,
                link: contenttype.record_link(record),
            })
            .collect();
        results.push(RecordGroup {
            contenttype: contenttype.slug.clone(),
            name: contenttype.name.clone(),
            records,
        });
    }
    Ok(Json(RecordBrowserContext { results }))
}
