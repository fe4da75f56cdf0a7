use super::*;

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(4000);
    raw.logging.level = Some("info".to_string());

    let overrides = ServeOverrides {
        server_port: Some(4321),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn page_sizes_default_to_public_nine_and_admin_twenty() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");
    assert_eq!(settings.content.public_page_size.get(), 9);
    assert_eq!(settings.content.admin_page_size.get(), 20);
    assert_eq!(settings.search.debounce, Duration::from_millis(300));
    assert!(settings.generation.endpoint.is_none());
}

#[test]
fn zero_page_size_is_rejected() {
    let mut raw = RawSettings::default();
    raw.content.public_page_size = Some(0);

    let err = Settings::from_raw(raw).expect_err("zero page size");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "content.public_page_size",
            ..
        }
    ));
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn remote_url_must_be_http() {
    let mut raw = RawSettings::default();
    raw.remote.base_url = Some("ftp://files.example.com".to_string());

    let err = Settings::from_raw(raw).expect_err("non-http url");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "remote.base_url",
            ..
        }
    ));
}

#[test]
fn blank_generation_endpoint_disables_generation() {
    let mut raw = RawSettings::default();
    raw.generation.endpoint = Some("   ".to_string());

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(settings.generation.endpoint.is_none());
}

#[test]
fn token_grants_resolve_roles_and_expiry() {
    let mut raw = RawSettings::default();
    raw.auth.tokens = vec![RawTokenGrant {
        token: " editor-token ".to_string(),
        user_id: "u-7".to_string(),
        name: None,
        email: Some("desk@example.com".to_string()),
        role: Some("ai".to_string()),
        expires_at: Some("2030-01-01T00:00:00Z".to_string()),
    }];

    let settings = Settings::from_raw(raw).expect("valid settings");
    let grant = &settings.auth.tokens[0];
    assert_eq!(grant.token, "editor-token");
    assert_eq!(grant.principal.name, "u-7");
    assert_eq!(grant.principal.role, AuthorRole::Ai);
    assert!(grant.expires_at.is_some());
}

#[test]
fn unknown_token_role_is_rejected() {
    let mut raw = RawSettings::default();
    raw.auth.tokens = vec![RawTokenGrant {
        token: "t".to_string(),
        user_id: "u".to_string(),
        name: None,
        email: None,
        role: Some("owner".to_string()),
        expires_at: None,
    }];

    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid {
            key: "auth.tokens.role",
            ..
        })
    ));
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["newsdesk"]);
    let command = args
        .command
        .unwrap_or(Command::Serve(Box::<ServeArgs>::default()));
    assert!(matches!(command, Command::Serve(_)));
}

#[test]
fn parse_export_arguments() {
    let args = CliArgs::parse_from([
        "newsdesk",
        "export",
        "--remote-url",
        "http://news.example.com",
        "/tmp/site.toml",
    ]);

    match args.command.expect("export command") {
        Command::ExportSite(export) => {
            assert_eq!(
                export.remote.remote_url.as_deref(),
                Some("http://news.example.com")
            );
            assert_eq!(export.file, std::path::Path::new("/tmp/site.toml"));
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_import_arguments() {
    let args = CliArgs::parse_from([
        "newsdesk",
        "import",
        "--remote-url",
        "http://news.example.com",
        "--remote-token",
        "secret",
        "/tmp/site.toml",
    ]);

    match args.command.expect("import command") {
        Command::ImportSite(import) => {
            assert_eq!(import.remote.remote_token.as_deref(), Some("secret"));
            assert_eq!(import.file, std::path::Path::new("/tmp/site.toml"));
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_search_arguments() {
    let args = CliArgs::parse_from([
        "newsdesk",
        "search",
        "--category",
        "Technology",
        "--page",
        "2",
        "future",
        "of",
        "AI",
    ]);

    match args.command.expect("search command") {
        Command::Search(search) => {
            assert_eq!(search.category.as_deref(), Some("Technology"));
            assert_eq!(search.page, 2);
            assert_eq!(search.text.join(" "), "future of AI");
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_serve_overrides() {
    let args = CliArgs::parse_from([
        "newsdesk",
        "serve",
        "--server-host",
        "0.0.0.0",
        "--seed",
        "/srv/seed.toml",
        "--public-page-size",
        "12",
    ]);

    match args.command.expect("serve command") {
        Command::Serve(serve) => {
            assert_eq!(serve.overrides.server_host.as_deref(), Some("0.0.0.0"));
            assert_eq!(
                serve.overrides.seed.as_deref(),
                Some(std::path::Path::new("/srv/seed.toml"))
            );
            assert_eq!(serve.overrides.public_page_size, Some(12));
        }
        _ => panic!("wrong command parsed"),
    }
}
