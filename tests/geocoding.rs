use profile_directory::{
    Coordinates, Directory, DirectoryError, GeocodeError, Geocoder,
    GeocoderConfig, MapboxGeocoder, ProfileField, ProfileStorage,
    ProfileStore,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serve one canned HTTP response on a loopback port and hand back the
/// raw request that was received.
async fn serve_once(
    status: &'static str,
    body: &'static str,
) -> (GeocoderConfig, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind loopback listener");
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        String::from_utf8_lossy(&request).into_owned()
    });

    let mut config = GeocoderConfig::new("pk.test");
    config.endpoint = format!("http://{}/geocoding/v5/mapbox.places", addr);
    config.timeout_secs = 2;
    (config, handle)
}

#[tokio::test]
async fn test_resolves_first_candidate() {
    let (config, server) = serve_once(
        "200 OK",
        r#"{"features":[{"center":[-122.084,37.422]},{"center":[0.0,0.0]}]}"#,
    )
    .await;
    let geocoder = MapboxGeocoder::new(&config).unwrap();

    let coordinates = geocoder
        .resolve("1600 Amphitheatre Parkway")
        .await
        .unwrap();
    assert_eq!(coordinates, Coordinates::new(-122.084, 37.422));

    let request = server.await.unwrap();
    assert!(request.starts_with(
        "GET /geocoding/v5/mapbox.places/1600%20Amphitheatre%20Parkway.json?access_token=pk.test HTTP/1.1"
    ));
}

#[tokio::test]
async fn test_empty_result_is_no_match() {
    let (config, server) = serve_once("200 OK", r#"{"features":[]}"#).await;
    let geocoder = MapboxGeocoder::new(&config).unwrap();

    let result = geocoder.resolve("Atlantis").await;
    assert_eq!(result, Err(GeocodeError::NoMatch("Atlantis".to_owned())));
    server.await.unwrap();
}

#[tokio::test]
async fn test_error_status_is_transport_failure() {
    let (config, server) =
        serve_once("401 Unauthorized", r#"{"message":"Not Authorized"}"#)
            .await;
    let geocoder = MapboxGeocoder::new(&config).unwrap();

    let result = geocoder.resolve("Paris").await;
    assert!(matches!(result, Err(GeocodeError::Transport(_))));
    server.await.unwrap();
}

#[tokio::test]
async fn test_malformed_body_is_transport_failure() {
    let (config, server) = serve_once("200 OK", "<html>oops</html>").await;
    let geocoder = MapboxGeocoder::new(&config).unwrap();

    let result = geocoder.resolve("Paris").await;
    assert!(matches!(result, Err(GeocodeError::Transport(_))));
    server.await.unwrap();
}

#[test]
fn test_directory_requires_token() {
    let config = GeocoderConfig::new("");
    let result = Directory::from_config(ProfileStore::new(), &config);
    assert!(matches!(result, Err(DirectoryError::Config(_))));
}

#[tokio::test]
async fn test_unreachable_service_is_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut config = GeocoderConfig::new("pk.test");
    config.endpoint = format!("http://{}/places", addr);
    let geocoder = MapboxGeocoder::new(&config).unwrap();

    let result = geocoder.resolve("Paris").await;
    assert!(matches!(result, Err(GeocodeError::Transport(_))));
}

#[tokio::test]
async fn test_silent_service_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
        drop(socket);
    });

    let mut config = GeocoderConfig::new("pk.test");
    config.endpoint = format!("http://{}/places", addr);
    config.timeout_secs = 1;
    let geocoder = MapboxGeocoder::new(&config).unwrap();

    let result = geocoder.resolve("Paris").await;
    assert!(matches!(result, Err(GeocodeError::Transport(_))));
    server.abort();
}

#[tokio::test]
async fn test_directory_saves_through_http_geocoder() {
    let (config, server) =
        serve_once("200 OK", r#"{"features":[{"center":[2.3522,48.8566]}]}"#)
            .await;
    let mut directory =
        Directory::from_config(ProfileStore::seeded().unwrap(), &config)
            .unwrap();
    let before = directory.profiles().len();

    directory.start_create().unwrap();
    directory.update_field(ProfileField::Name, "Amélie").unwrap();
    directory
        .update_field(ProfileField::Description, "Photographer")
        .unwrap();
    directory.update_field(ProfileField::Address, "Paris").unwrap();
    directory
        .update_field(ProfileField::Image, "https://example.com/a.jpg")
        .unwrap();

    let saved = directory.save().await.unwrap();
    assert_eq!(saved.coordinates, Coordinates::new(2.3522, 48.8566));
    assert_eq!(directory.store().len(), before + 1);
    assert!(!directory.is_dialog_open());
    server.await.unwrap();
}
