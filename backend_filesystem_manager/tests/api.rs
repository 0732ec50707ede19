use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use backend_filesystem_manager::{build, config::ManagerConfig};
use rocket::figment::providers::Serialized;
use rocket::figment::Figment;
use rocket::http::{ContentType, Header, Status};
use rocket::local::blocking::{Client, LocalResponse};
use rocket::serde::json::Value;
use tempfile::TempDir;

const PASSWORD: &str = "correct horse";

const CONTENT: &str = r#"{
    "contenttypes": [
        {"slug": "pages", "singular_slug": "page", "name": "Pages", "singular_name": "Page", "records": [
            {"id": 1, "title": "About", "slug": "about", "status": "published"},
            {"id": 2, "title": "Draft", "slug": "draft", "status": "draft"},
            {"id": 5, "status": "published"}
        ]},
        {"slug": "entries", "singular_slug": "entry", "name": "Entries", "records": [
            {"id": 9, "title": "Hello world", "slug": "hello-world", "status": "published"},
            {"id": 10, "title": "Later", "slug": "later", "status": "timed"}
        ]},
        {"slug": "showcases", "singular_slug": "showcase", "records": []}
    ]
}"#;

struct Harness {
    dir: TempDir,
    client: Client,
    token: String,
}

impl Harness {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let content_path = dir.path().join("content.json");
        std::fs::write(&content_path, CONTENT).unwrap();

        let mut namespaces = BTreeMap::new();
        namespaces.insert("files".to_string(), dir.path().join("files"));
        namespaces.insert("themes".to_string(), dir.path().join("themes"));
        let config = ManagerConfig {
            namespaces,
            default_namespace: "files".to_string(),
            content_path: Some(content_path),
            admin_password: PASSWORD.to_string(),
            token_ttl_secs: 600,
            allowed_origins: vec!["http://localhost".to_string()],
        };
        let figment = Figment::from(rocket::Config::debug_default())
            .merge(Serialized::defaults(config))
            .merge(("log_level", "off"));

        let client = Client::tracked(build(figment)).expect("valid rocket instance");
        let token = login(&client, PASSWORD).expect("login succeeds");
        Harness { dir, client, token }
    }

    fn root(&self, namespace: &str) -> PathBuf {
        self.dir.path().join(namespace)
    }

    fn auth(&self) -> Header<'static> {
        Header::new("Authorization", self.token.clone())
    }

    fn get(&self, uri: &str) -> LocalResponse<'_> {
        self.client.get(uri.to_string()).header(self.auth()).dispatch()
    }

    fn post(&self, uri: &str, form: &str) -> LocalResponse<'_> {
        self.client
            .post(uri.to_string())
            .header(ContentType::Form)
            .header(self.auth())
            .body(form.to_string())
            .dispatch()
    }
}

fn login(client: &Client, password: &str) -> Option<String> {
    let response = client
        .post("/async/auth")
        .header(ContentType::JSON)
        .body(format!(r#"{{"password":"{password}"}}"#))
        .dispatch();
    if response.status() != Status::Ok {
        return None;
    }
    let body: Value = response.into_json()?;
    body["token"].as_str().map(str::to_string)
}

fn json(response: LocalResponse<'_>) -> (Status, Value) {
    let status = response.status();
    (status, response.into_json().expect("json body"))
}

fn write(root: &Path, rel: &str, contents: &str) {
    let full = root.join(rel);
    std::fs::create_dir_all(full.parent().unwrap()).unwrap();
    std::fs::write(full, contents).unwrap();
}

#[test]
fn requests_without_a_token_are_rejected() {
    let h = Harness::new();
    let response = h.client.get("/async/browse").dispatch();
    assert_eq!(response.status(), Status::Unauthorized);

    let response = h
        .client
        .post("/async/file/create")
        .header(ContentType::Form)
        .header(Header::new("Authorization", "not-a-token"))
        .body("namespace=files&parentPath=&filename=a.txt")
        .dispatch();
    assert_eq!(response.status(), Status::Unauthorized);
    assert!(!h.root("files").join("a.txt").exists());

    assert!(login(&h.client, "wrong").is_none());
}

#[test]
fn browse_lists_folder_with_breadcrumbs() {
    let h = Harness::new();
    write(&h.root("files"), "2024/holidays/beach.jpg", "jpg");
    write(&h.root("files"), "2024/holidays/notes.txt", "txt");
    write(&h.root("files"), "2024/holidays/.DS_Store", "");
    std::fs::create_dir_all(h.root("files").join("2024/holidays/day1")).unwrap();

    let response = h.get("/async/browse/files/2024/holidays?key=image");
    assert!(response.cookies().get("_flash").is_none());
    let (status, body) = json(response);
    assert_eq!(status, Status::Ok);
    assert_eq!(body["namespace"], "files");
    assert_eq!(body["key"], "image");
    assert_eq!(body["title"], "Files in 2024/holidays");

    let names: Vec<_> = body["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["beach.jpg", "notes.txt"]);
    assert_eq!(body["files"][0]["path"], "2024/holidays/beach.jpg");
    assert_eq!(body["files"][0]["is_image"], true);
    assert_eq!(body["folders"][0]["name"], "day1");

    let segments = body["pathsegments"].as_array().unwrap();
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0]["name"], "2024");
    assert_eq!(segments[0]["path"], "2024/");
    assert_eq!(segments[1]["name"], "holidays");
    assert_eq!(segments[1]["path"], "2024/holidays/");

    // A trailing slash lists the same folder with the same breadcrumbs
    let response = h.get("/async/browse/files/2024/holidays/");
    assert!(response.cookies().get("_flash").is_none());
    let (status, body) = json(response);
    assert_eq!(status, Status::Ok);
    assert_eq!(body["title"], "Files in 2024/holidays");
    let segments = body["pathsegments"].as_array().unwrap();
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[1]["name"], "holidays");
    assert_eq!(segments[1]["path"], "2024/holidays/");
}

#[test]
fn browse_defaults_to_files_root() {
    let h = Harness::new();
    write(&h.root("files"), "index.html", "<html>");

    let (status, body) = json(h.get("/async/browse"));
    assert_eq!(status, Status::Ok);
    assert_eq!(body["namespace"], "files");
    assert_eq!(body["files"][0]["name"], "index.html");
    assert!(body["pathsegments"].as_array().unwrap().is_empty());
    assert!(body["key"].is_null());

    let (status, body) = json(h.get("/async/browse/themes"));
    assert_eq!(status, Status::Ok);
    assert_eq!(body["namespace"], "themes");
    assert!(body["files"].as_array().unwrap().is_empty());
}

#[test]
fn browse_of_missing_folder_flashes_and_lists_nothing() {
    let h = Harness::new();
    let response = h.get("/async/browse/files/nowhere");
    assert!(response.cookies().get("_flash").is_some());
    let (status, body) = json(response);
    assert_eq!(status, Status::Ok);
    assert!(body["files"].as_array().unwrap().is_empty());
    assert!(body["folders"].as_array().unwrap().is_empty());

    let (_, notices) = json(h.get("/async/flashes"));
    assert_eq!(notices[0]["kind"], "error");
    assert_eq!(
        notices[0]["message"],
        "Folder 'nowhere' could not be found, or is not readable."
    );

    // Flashes are one-shot
    let (_, notices) = json(h.get("/async/flashes"));
    assert!(notices.as_array().unwrap().is_empty());
}

#[test]
fn browse_unknown_namespace_is_an_error() {
    let h = Harness::new();
    let (status, body) = json(h.get("/async/browse/cache/x"));
    assert_eq!(status, Status::NotFound);
    assert_eq!(body["success"], false);
    assert_eq!(body["kind"], "unknown_namespace");
}

#[test]
fn create_then_delete_file() {
    let h = Harness::new();
    std::fs::create_dir_all(h.root("files").join("docs")).unwrap();

    let (status, body) = json(h.post(
        "/async/file/create",
        "namespace=files&parentPath=docs&filename=notes.txt",
    ));
    assert_eq!(status, Status::Ok);
    assert_eq!(body, true);
    assert_eq!(std::fs::read_to_string(h.root("files").join("docs/notes.txt")).unwrap(), " ");

    let (status, body) = json(h.post(
        "/async/file/create",
        "namespace=files&parentPath=docs&filename=notes.txt",
    ));
    assert_eq!(status, Status::Conflict);
    assert_eq!(body["kind"], "already_exists");

    let (status, body) = json(h.post(
        "/async/file/delete",
        "namespace=files&filename=docs/notes.txt",
    ));
    assert_eq!(status, Status::Ok);
    assert_eq!(body, true);
    assert!(!h.root("files").join("docs/notes.txt").exists());

    let (status, body) = json(h.post(
        "/async/file/delete",
        "namespace=files&filename=docs/notes.txt",
    ));
    assert_eq!(status, Status::NotFound);
    assert_eq!(body["success"], false);
    assert_eq!(body["kind"], "not_found");
}

#[test]
fn paths_cannot_escape_their_namespace() {
    let h = Harness::new();
    write(h.dir.path(), "content-backup.json", "{}");

    let (status, body) = json(h.post(
        "/async/file/delete",
        "namespace=files&filename=../content-backup.json",
    ));
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["kind"], "invalid_path");
    assert!(h.dir.path().join("content-backup.json").exists());

    let (status, _) = json(h.post(
        "/async/folder/create",
        "namespace=files&parent=../&foldername=evil",
    ));
    assert_eq!(status, Status::BadRequest);
    assert!(!h.dir.path().join("evil").exists());
}

#[test]
fn duplicate_file_picks_copy_names() {
    let h = Harness::new();
    write(&h.root("files"), "docs/report.pdf", "%PDF-1.7");

    let (status, body) = json(h.post(
        "/async/file/duplicate",
        "namespace=files&filename=docs/report.pdf",
    ));
    assert_eq!(status, Status::Ok);
    assert_eq!(body, true);
    assert_eq!(
        std::fs::read_to_string(h.root("files").join("docs/report_copy.pdf")).unwrap(),
        "%PDF-1.7"
    );

    let (status, _) = json(h.post(
        "/async/file/duplicate",
        "namespace=files&filename=docs/report.pdf",
    ));
    assert_eq!(status, Status::Ok);
    assert!(h.root("files").join("docs/report_copy1.pdf").is_file());

    let (status, body) = json(h.post(
        "/async/file/duplicate",
        "namespace=files&filename=docs/missing.pdf",
    ));
    assert_eq!(status, Status::NotFound);
    assert_eq!(body["kind"], "not_found");
}

#[test]
fn rename_file_round_trip() {
    let h = Harness::new();
    write(&h.root("files"), "docs/a.txt", "alpha");

    let (status, body) = json(h.post(
        "/async/file/rename",
        "namespace=files&parent=docs&oldname=a.txt&newname=b.txt",
    ));
    assert_eq!((status, body), (Status::Ok, Value::Bool(true)));
    assert!(!h.root("files").join("docs/a.txt").exists());

    let (status, _) = json(h.post(
        "/async/file/rename",
        "namespace=files&parent=docs&oldname=b.txt&newname=a.txt",
    ));
    assert_eq!(status, Status::Ok);
    assert_eq!(std::fs::read_to_string(h.root("files").join("docs/a.txt")).unwrap(), "alpha");

    let (status, body) = json(h.post(
        "/async/file/rename",
        "namespace=files&parent=docs&oldname=ghost.txt&newname=c.txt",
    ));
    assert_eq!(status, Status::NotFound);
    assert_eq!(body["kind"], "not_found");
}

#[test]
fn folder_lifecycle() {
    let h = Harness::new();

    let (status, _) = json(h.post(
        "/async/folder/create",
        "namespace=themes&parent=&foldername=base",
    ));
    assert_eq!(status, Status::Ok);
    assert!(h.root("themes").join("base").is_dir());

    let (status, body) = json(h.post(
        "/async/folder/create",
        "namespace=themes&parent=&foldername=base",
    ));
    assert_eq!(status, Status::Conflict);
    assert_eq!(body["kind"], "already_exists");

    write(&h.root("themes"), "base/css/theme.css", "body{}");
    let (status, _) = json(h.post(
        "/async/folder/rename",
        "namespace=themes&parent=&oldname=base&newname=skeleton",
    ));
    assert_eq!(status, Status::Ok);
    assert!(h.root("themes").join("skeleton/css/theme.css").is_file());

    let (status, _) = json(h.post(
        "/async/folder/rename",
        "namespace=themes&parent=&oldname=skeleton&newname=base",
    ));
    assert_eq!(status, Status::Ok);
    assert!(h.root("themes").join("base/css/theme.css").is_file());

    let (status, body) = json(h.post(
        "/async/folder/remove",
        "namespace=themes&parent=&foldername=base",
    ));
    assert_eq!((status, body), (Status::Ok, Value::Bool(true)));
    assert!(!h.root("themes").join("base").exists());

    let (status, body) = json(h.post(
        "/async/folder/remove",
        "namespace=themes&parent=&foldername=",
    ));
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["kind"], "invalid_path");
    assert!(h.root("themes").is_dir());
}

#[test]
fn autocomplete_searches_default_namespace() {
    let h = Harness::new();
    write(&h.root("files"), "images/logo.png", "");
    write(&h.root("files"), "images/logo.svg", "");
    write(&h.root("files"), "docs/logo-guide.pdf", "");
    write(&h.root("themes"), "logo.png", "");

    let (status, body) = json(h.get("/async/file/autocomplete?term=logo&ext=png,svg"));
    assert_eq!(status, Status::Ok);
    assert_eq!(body, rocket::serde::json::json!(["images/logo.png", "images/logo.svg"]));

    let (_, body) = json(h.get("/async/file/autocomplete?term=guide"));
    assert_eq!(body, rocket::serde::json::json!(["docs/logo-guide.pdf"]));
}

#[test]
fn record_browser_lists_published_records() {
    let h = Harness::new();
    let (status, body) = json(h.get("/async/recordbrowser"));
    assert_eq!(status, Status::Ok);

    let groups = body["results"].as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["contenttype"], "pages");
    assert_eq!(groups[1]["contenttype"], "entries");

    let all: Vec<&Value> = groups
        .iter()
        .flat_map(|g| g["records"].as_array().unwrap())
        .collect();
    assert_eq!(all.len(), 3);
    for record in &all {
        assert!(!record["title"].as_str().unwrap().is_empty());
        assert!(record["id"].as_u64().is_some());
        assert!(!record["link"].as_str().unwrap().is_empty());
    }

    assert_eq!(groups[0]["records"][0]["title"], "About");
    assert_eq!(groups[0]["records"][0]["link"], "/page/about");
    assert_eq!(groups[0]["records"][1]["title"], "Page #5");
    assert_eq!(groups[0]["records"][1]["link"], "/page/5");
    assert_eq!(groups[1]["records"][0]["link"], "/entry/hello-world");
}
