use spotlas::link::{extract_id, parse};
use spotlas::{
    Genre, PlaylistItem, ResourceKind, SearchQuery, SpotifyError, SpotifyLink, Track, TrackRef,
};

// Helper to keep the assertions short
fn kind_and_id(input: &str) -> (ResourceKind, String) {
    let link = parse(input).expect("input should parse");
    (link.kind, link.id)
}

#[test]
fn test_parse_accepts_every_share_link_spelling() {
    // Plain share URL
    assert_eq!(
        kind_and_id("https://open.spotify.com/track/4u7EnebtmKWzUH433cf5Qv"),
        (ResourceKind::Track, "4u7EnebtmKWzUH433cf5Qv".to_string())
    );

    // Share URL with tracking query
    assert_eq!(
        kind_and_id("https://open.spotify.com/album/2PPMzbHGYDjLazQ2age3pQ?si=aBcD123"),
        (ResourceKind::Album, "2PPMzbHGYDjLazQ2age3pQ".to_string())
    );

    // Locale-prefixed URL
    assert_eq!(
        kind_and_id("https://open.spotify.com/intl-es/artist/0TnOYISbd1XYRBk9myaseg"),
        (ResourceKind::Artist, "0TnOYISbd1XYRBk9myaseg".to_string())
    );

    // Trailing slash
    assert_eq!(
        kind_and_id("https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M/"),
        (ResourceKind::Playlist, "37i9dQZF1DXcBWIGoYBM5M".to_string())
    );

    // Scheme-less
    assert_eq!(
        kind_and_id("open.spotify.com/user/spotify"),
        (ResourceKind::User, "spotify".to_string())
    );

    // URI form
    assert_eq!(
        kind_and_id("spotify:track:4u7EnebtmKWzUH433cf5Qv"),
        (ResourceKind::Track, "4u7EnebtmKWzUH433cf5Qv".to_string())
    );
}

#[test]
fn test_parse_rejections() {
    // Bare IDs carry no kind
    assert!(matches!(
        parse("4u7EnebtmKWzUH433cf5Qv"),
        Err(SpotifyError::InvalidLink(_))
    ));

    // Unknown path kinds
    assert!(matches!(
        parse("https://open.spotify.com/badurl/fakeid"),
        Err(SpotifyError::InvalidLink(_))
    ));
    assert!(matches!(
        parse("https://open.spotify.com/episode/512ojhOuo1ktJprKbVcKyQ"),
        Err(SpotifyError::InvalidLink(_))
    ));

    // Foreign hosts
    assert!(matches!(
        parse("https://example.com/track/4u7EnebtmKWzUH433cf5Qv"),
        Err(SpotifyError::InvalidLink(_))
    ));

    assert!(matches!(parse(""), Err(SpotifyError::InvalidLink(_))));
}

#[test]
fn test_extract_id_with_explicit_kind() {
    // Bare IDs work once the kind is known
    assert_eq!(
        extract_id("4u7EnebtmKWzUH433cf5Qv", ResourceKind::Track).unwrap(),
        "4u7EnebtmKWzUH433cf5Qv"
    );

    // Full links still work, and their kind must agree
    assert_eq!(
        extract_id(
            "https://open.spotify.com/track/4u7EnebtmKWzUH433cf5Qv",
            ResourceKind::Track
        )
        .unwrap(),
        "4u7EnebtmKWzUH433cf5Qv"
    );
    assert!(matches!(
        extract_id(
            "https://open.spotify.com/album/2PPMzbHGYDjLazQ2age3pQ",
            ResourceKind::Track
        ),
        Err(SpotifyError::InvalidLink(_))
    ));

    // Legacy usernames allow dots and underscores, other kinds do not
    assert_eq!(
        extract_id("some.legacy_user-1", ResourceKind::User).unwrap(),
        "some.legacy_user-1"
    );
    assert!(matches!(
        extract_id("not.a.track.id", ResourceKind::Track),
        Err(SpotifyError::InvalidLink(_))
    ));
}

#[test]
fn test_link_round_trips() {
    let link: SpotifyLink = "spotify:album:2PPMzbHGYDjLazQ2age3pQ".parse().unwrap();
    assert_eq!(link.uri(), "spotify:album:2PPMzbHGYDjLazQ2age3pQ");
    assert_eq!(
        link.url(),
        "https://open.spotify.com/album/2PPMzbHGYDjLazQ2age3pQ"
    );

    // The canonical URL parses back to the same link
    let reparsed = parse(&link.url()).unwrap();
    assert_eq!(reparsed, link);
}

#[test]
fn test_query_builder_full_render() {
    let query = SearchQuery::new("higher ground")
        .artist("Stevie Wonder")
        .year_range(1970, 1979)
        .genre(Genre::Funk);

    assert_eq!(
        query.build(),
        "higher ground artist:Stevie Wonder year:1970-1979 genre:funk"
    );
}

#[test]
fn test_query_builder_tags_and_codes() {
    let query = SearchQuery::new("")
        .album("Innervisions")
        .upc("602557097554")
        .isrc("USMO17300106")
        .hipster()
        .new_releases();

    let rendered = query.build();
    assert!(rendered.contains("album:Innervisions"));
    assert!(rendered.contains("upc:602557097554"));
    assert!(rendered.contains("isrc:USMO17300106"));
    assert!(rendered.contains("tag:hipster"));
    assert!(rendered.contains("tag:new"));
}

#[test]
fn test_query_from_plain_text() {
    let query: SearchQuery = "lofi beats".into();
    assert_eq!(query.build(), "lofi beats");

    let custom = SearchQuery::new("sax").genre(Genre::Custom("vaporwave".to_string()));
    assert_eq!(custom.build(), "sax genre:vaporwave");
}

#[test]
fn test_track_refs_resolve_to_uris() {
    // Raw IDs, typed tracks and playlist items all make valid URIs
    assert_eq!(
        "4u7EnebtmKWzUH433cf5Qv".track_uri(),
        "spotify:track:4u7EnebtmKWzUH433cf5Qv"
    );

    let track = Track::new("Higher Ground", "4u7EnebtmKWzUH433cf5Qv");
    assert_eq!(track.track_uri(), "spotify:track:4u7EnebtmKWzUH433cf5Qv");

    let item = PlaylistItem::from_track(track);
    assert_eq!(item.track_uri(), "spotify:track:4u7EnebtmKWzUH433cf5Qv");
}

#[test]
fn test_resources_compare_by_id() {
    let a = Track::new("Higher Ground", "4u7EnebtmKWzUH433cf5Qv");
    let mut b = Track::new("Higher Ground (Remaster)", "4u7EnebtmKWzUH433cf5Qv");
    b.popularity = 99;
    assert_eq!(a, b);

    let c = Track::new("Higher Ground", "differentid123");
    assert_ne!(a, c);
}
