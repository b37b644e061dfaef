use canvas::camera::Point;
use canvas::engine::Engine;
use uuid::Uuid;

use super::*;

fn temp_file(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("floorplan-{}", Uuid::new_v4())).join(name)
}

#[test]
fn read_missing_file_is_none() {
    let storage = FileStorage::new(temp_file("session.json"));
    assert!(storage.read().unwrap().is_none());
}

#[test]
fn write_creates_parent_and_reads_back() {
    let path = temp_file("session.json");
    let mut storage = FileStorage::new(&path);
    storage.write("{\"walls\":[]}").unwrap();
    assert_eq!(storage.read().unwrap().as_deref(), Some("{\"walls\":[]}"));
    assert!(!storage.temp_path().exists());

    storage.write("second").unwrap();
    assert_eq!(storage.read().unwrap().as_deref(), Some("second"));

    fs::remove_dir_all(path.parent().unwrap()).unwrap();
}

#[test]
fn remove_is_idempotent() {
    let path = temp_file("session.json");
    let mut storage = FileStorage::new(&path);
    storage.write("x").unwrap();
    storage.remove().unwrap();
    assert!(!path.exists());
    storage.remove().unwrap();

    fs::remove_dir_all(path.parent().unwrap()).unwrap();
}

#[test]
fn read_directory_is_io_error() {
    let dir = std::env::temp_dir().join(format!("floorplan-{}", Uuid::new_v4()));
    fs::create_dir_all(&dir).unwrap();
    let storage = FileStorage::new(&dir);
    assert!(matches!(storage.read(), Err(PersistError::Io(_))));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn engine_session_survives_reopen() {
    let path = temp_file("session.json");
    let mut engine = Engine::new(FileStorage::new(&path));
    let wall = engine.add_wall(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
    engine.add_window(wall.id, 0.5);

    let mut reopened = Engine::new(FileStorage::new(&path));
    reopened.load().unwrap().unwrap();
    assert_eq!(reopened.core.snapshot(), engine.core.snapshot());

    fs::remove_dir_all(path.parent().unwrap()).unwrap();
}
