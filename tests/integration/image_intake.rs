//! Integration tests for photo intake

use crate::integration::test_utils::Harness;
use wrapview::intake::{ImageFile, IntakeSurface};
use wrapview::selection::{VehicleIdentity, UPLOADED_PHOTO_LABEL};
use wrapview::IntakeError;

fn photo() -> ImageFile {
    ImageFile::new("car.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0])
}

#[tokio::test]
async fn test_photo_makes_selection_ready_without_make() {
    let mut h = Harness::standard();
    h.session.select_wrap_by_name("Midnight Purple").unwrap();
    assert!(!h.session.ready_to_generate());

    let reference = h
        .session
        .accept_image(&photo(), IntakeSurface::DragAndDrop)
        .unwrap();
    assert!(reference
        .as_str()
        .starts_with(&format!("local://{}/", h.session.session_id())));
    assert!(h.session.ready_to_generate());

    h.session.generate();
    h.session.settle().await;
    let summary = h.session.generation().summary().unwrap();
    assert_eq!(summary.vehicle_label, UPLOADED_PHOTO_LABEL);
    assert_eq!(summary.wrap_label, "Midnight Purple (Gloss)");
}

#[tokio::test]
async fn test_photo_takes_precedence_over_catalog_vehicle() {
    let mut h = Harness::standard();
    h.choose_vehicle("Audi", "A3").await;
    h.session.select_wrap_by_name("Gloss Black").unwrap();
    let reference = h
        .session
        .accept_image(&photo(), IntakeSurface::FilePicker)
        .unwrap();

    h.session.generate();
    h.session.settle().await;

    let requests = h.backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].vehicle, VehicleIdentity::Image { reference });
    assert_eq!(
        h.session.generation().summary().unwrap().vehicle_label,
        UPLOADED_PHOTO_LABEL
    );
    // make and model are still recorded
    assert_eq!(h.session.selection().make(), "Audi");
}

#[tokio::test]
async fn test_non_image_is_rejected_without_state_change() {
    let mut h = Harness::standard();
    h.choose_vehicle("BMW", "M3").await;
    h.session.select_wrap_by_name("Matte White").unwrap();
    h.session.generate();
    h.session.settle().await;
    let before = h.session.snapshot();

    let pdf = ImageFile::new("brochure.pdf", "application/pdf", b"%PDF".to_vec());
    let err = h
        .session
        .accept_image(&pdf, IntakeSurface::DragAndDrop)
        .unwrap_err();

    assert_eq!(
        err,
        IntakeError::NotAnImage {
            content_type: "application/pdf".to_string()
        }
    );
    assert_eq!(h.session.snapshot(), before);
}

#[tokio::test]
async fn test_new_photo_replaces_previous_one() {
    let mut h = Harness::standard();
    let first = h
        .session
        .accept_image(&photo(), IntakeSurface::FilePicker)
        .unwrap();
    let second_file = ImageFile::new("side.PNG", "IMAGE/PNG", vec![0x89, 0x50, 0x4E, 0x47]);
    let second = h
        .session
        .accept_image(&second_file, IntakeSurface::FilePicker)
        .unwrap();

    assert_ne!(first, second);
    assert_eq!(h.session.selection().image(), Some(&second));
}

#[tokio::test]
async fn test_photo_from_disk() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("garage.webp");
    std::fs::write(&path, b"RIFF....WEBP").unwrap();

    let file = ImageFile::from_path(&path).unwrap();
    assert_eq!(file.content_type, "image/webp");

    let mut h = Harness::standard();
    assert!(h
        .session
        .accept_image(&file, IntakeSurface::FilePicker)
        .is_ok());
    assert!(h.session.selection().has_vehicle());
}
