use itinerary_rs::{ImageCache, PlaceCatalogEntry};

#[tokio::test]
async fn test_images_are_downloaded_once() {
    let mut server = mockito::Server::new_async().await;
    let canyon = server
        .mock("GET", "/images/canyon.jpg")
        .with_status(200)
        .with_header("content-type", "image/jpeg")
        .with_body(b"jpeg-bytes".as_slice())
        .expect(1)
        .create_async()
        .await;
    let missing = server
        .mock("GET", "/images/missing.jpg")
        .with_status(404)
        .create_async()
        .await;
    let cached = server
        .mock("GET", "/images/cached.jpg")
        .expect(0)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cache_dir = dir.path().join("day_images");
    std::fs::create_dir_all(&cache_dir).unwrap();
    std::fs::write(cache_dir.join("cached.jpg"), b"old").unwrap();

    let base = server.url();
    let mut entries = vec![
        PlaceCatalogEntry::new("Grand Canyon").with_image_url(format!("{base}/images/canyon.jpg")),
        PlaceCatalogEntry::new("Lost Place").with_image_url(format!("{base}/images/missing.jpg")),
        PlaceCatalogEntry::new("Known Place").with_image_url(format!("{base}/images/cached.jpg")),
        PlaceCatalogEntry::new("No Image").with_local_image("file:///stale.jpg"),
    ];

    let cache = ImageCache::new(&cache_dir);
    cache.ensure_local_images(&mut entries).await.unwrap();

    canyon.assert_async().await;
    missing.assert_async().await;
    cached.assert_async().await;

    let canyon_uri = entries[0].local_image.as_deref().unwrap();
    assert!(canyon_uri.starts_with("file:///"), "{canyon_uri}");
    assert!(canyon_uri.ends_with("day_images/canyon.jpg"), "{canyon_uri}");
    assert_eq!(std::fs::read(cache_dir.join("canyon.jpg")).unwrap(), b"jpeg-bytes");

    assert_eq!(entries[1].local_image, None);
    assert!(entries[2].local_image.as_deref().unwrap().ends_with("cached.jpg"));
    assert_eq!(std::fs::read(cache_dir.join("cached.jpg")).unwrap(), b"old");
    assert_eq!(entries[3].local_image, None);
}

#[tokio::test]
async fn test_cache_dir_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");

    ImageCache::new(&nested)
        .ensure_local_images(&mut [])
        .await
        .unwrap();
    assert!(nested.is_dir());
}
