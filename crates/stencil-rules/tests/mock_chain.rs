use stencil_core::{BoundValue, Bounds, ColumnDescriptor};
use stencil_rules::{MOCK_RULES, MockDirective, MockOutcome, map_mock};

fn range(min: i64, max: i64) -> Bounds {
    Bounds::Range {
        min: BoundValue::Int(min),
        max: BoundValue::Int(max),
    }
}

fn mapped(column: &ColumnDescriptor) -> (&'static str, MockDirective) {
    match map_mock(&column.classify()) {
        MockOutcome::Mapped { rule, directive } => (rule, directive),
        MockOutcome::Omitted => panic!("{} should be mapped", column.name),
    }
}

fn directive(column: &ColumnDescriptor) -> String {
    mapped(column).1.to_string()
}

#[test]
fn id_column_is_omitted() {
    let column = ColumnDescriptor::new("id", "UUID");
    assert_eq!(map_mock(&column.classify()), MockOutcome::Omitted);

    let bounded = ColumnDescriptor::new("id", "INT").with_bounds(range(1, 10));
    assert_eq!(map_mock(&bounded.classify()), MockOutcome::Omitted);
}

#[test]
fn json_family_wins_over_name_rules() {
    let column = ColumnDescriptor::new("release_date", "JSONB");
    let (rule, directive) = mapped(&column);
    assert_eq!(rule, "json_sample");
    assert_eq!(directive, MockDirective::JsonSample);
    assert_eq!(directive.template_key(&column.name), "release_date|1");
}

#[test]
fn name_patterns_map_to_fixed_directives() {
    assert_eq!(
        directive(&ColumnDescriptor::new("birth_date", "VARCHAR(10)")),
        "@date"
    );
    assert_eq!(
        directive(&ColumnDescriptor::new("app_version", "VARCHAR(16)")),
        r#"@string("number",2).@string("number",2).@string("number",3)"#
    );
    assert_eq!(
        directive(&ColumnDescriptor::new("cover_video", "TEXT")),
        r#"@url("https").@pick(mp4,mov,avi)"#
    );
    assert_eq!(
        directive(&ColumnDescriptor::new("name", "VARCHAR(64)")),
        "@ctitle(3, 10)"
    );
    assert_eq!(
        directive(&ColumnDescriptor::new("contact_email", "VARCHAR(255)")),
        "@email"
    );
    assert_eq!(
        directive(&ColumnDescriptor::new("login_ip", "VARCHAR(45)")),
        "@ip"
    );
    assert_eq!(
        directive(&ColumnDescriptor::new("last_ip_address", "VARCHAR(45)")),
        "@ip"
    );
}

#[test]
fn image_rule_precedes_comment_pick() {
    let column = ColumnDescriptor::new("profile_image", "VARCHAR(255)").with_comment("a/b");
    let (rule, directive) = mapped(&column);
    assert_eq!(rule, "image_name");
    assert_eq!(directive.to_string(), r#"@url("https").@pick(png,jpg,svg)"#);
}

#[test]
fn comment_pick_uses_last_token() {
    let column = ColumnDescriptor::new("status", "VARCHAR(16)")
        .with_comment("allowed values active/inactive/banned");
    let (rule, directive) = mapped(&column);
    assert_eq!(rule, "comment_pick");
    assert_eq!(
        directive,
        MockDirective::Pick(vec![
            "active".to_string(),
            "inactive".to_string(),
            "banned".to_string(),
        ])
    );
    assert_eq!(
        directive.to_string(),
        r#"@pick(["active","inactive","banned"])"#
    );
}

#[test]
fn comment_without_slash_falls_through() {
    let column = ColumnDescriptor::new("nickname", "VARCHAR(32)").with_comment("display name");
    assert_eq!(directive(&column), r#"@string("lower",32)"#);
}

#[test]
fn bounds_map_verbatim_to_bounded_integer() {
    let column = ColumnDescriptor::new("age", "INT").with_bounds(range(0, 120));
    let (rule, directive) = mapped(&column);
    assert_eq!(rule, "validate_bounds");
    assert_eq!(directive.to_string(), "@integer(0,120)");
}

#[test]
fn bounds_precede_id_suffix() {
    let column = ColumnDescriptor::new("user_id", "UUID").with_bounds(range(1, 500));
    let (rule, directive) = mapped(&column);
    assert_eq!(rule, "validate_bounds");
    assert_eq!(directive.to_string(), "@integer(1,500)");

    let unbounded = ColumnDescriptor::new("user_id", "UUID");
    assert_eq!(mapped(&unbounded), ("id_suffix", MockDirective::Uuid));
}

#[test]
fn slash_comment_precedes_bounds_and_id_suffix() {
    let column = ColumnDescriptor::new("limit_id", "INT")
        .with_comment("tiers 1/2/3")
        .with_bounds(range(1, 3));
    assert_eq!(mapped(&column).0, "comment_pick");

    let column = ColumnDescriptor::new("limit_id", "INT")
        .with_comment("tier limit")
        .with_bounds(range(1, 3));
    assert_eq!(mapped(&column).0, "validate_bounds");
}

#[test]
fn partial_or_malformed_bounds_fall_through() {
    let partial = ColumnDescriptor::new("owner_id", "UUID").with_bounds(Bounds::Partial);
    assert_eq!(mapped(&partial).0, "id_suffix");

    let malformed = ColumnDescriptor::new("quantity", "SMALLINT")
        .with_bounds(Bounds::Malformed("min 'low' is not a number".to_string()));
    assert_eq!(directive(&malformed), "@integer(0, 32767)");
}

#[test]
fn number_suffix_uses_parameter_when_present() {
    assert_eq!(
        directive(&ColumnDescriptor::new("phone_number", "VARCHAR(11)")),
        r#"@string("number", 11)"#
    );
    assert_eq!(
        directive(&ColumnDescriptor::new("order_no", "TEXT")),
        r#"@string("number")"#
    );
}

#[test]
fn base_type_table_defaults() {
    let cases = [
        ("title", "VARCHAR", r#"@string("lower",255)"#),
        ("code", "CHAR", r#"@string("lower",1)"#),
        ("code", "char(3)", r#"@string("lower",3)"#),
        ("summary", "TEXT", "@paragraph(1, 3)"),
        ("summary", "MEDIUMTEXT", "@paragraph(2, 5)"),
        ("body", "LONGTEXT", "@paragraph(3, 7)"),
        ("flags", "TINYINT(1)", "@integer(0, 255)"),
        ("rank", "SMALLINT", "@integer(0, 32767)"),
        ("count", "INT(11)", "@integer(0, 2147483647)"),
        ("views", "BIGINT", "@integer(0, 9007199254740991)"),
        ("price", "DECIMAL(10,2)", "@float(0, 100, 2, 6)"),
        ("ratio", "NUMERIC", "@float(0, 100, 2, 6)"),
        ("active", "BOOLEAN", "@boolean"),
        ("created_at", "TIMESTAMP", "@datetime"),
    ];

    for (name, raw_type, expected) in cases {
        let column = ColumnDescriptor::new(name, raw_type);
        let (rule, directive) = mapped(&column);
        assert_eq!(rule, "base_type", "{name} {raw_type}");
        assert_eq!(directive.to_string(), expected, "{name} {raw_type}");
    }
}

#[test]
fn unrecognized_family_is_marked_unknown() {
    for raw_type in ["GEOMETRY(Point, 4326)", "DATETIME", "", "UUID"] {
        let column = ColumnDescriptor::new("location", raw_type);
        let (rule, directive) = mapped(&column);
        assert_eq!(rule, "unknown", "{raw_type}");
        assert!(directive.is_unknown());
        assert_eq!(directive.to_string(), "@unknown");
    }
}

#[test]
fn each_rule_is_checked_in_declared_order() {
    let names: Vec<&str> = MOCK_RULES.iter().map(|rule| rule.name).collect();
    assert_eq!(
        names,
        vec![
            "json_sample",
            "date_suffix",
            "version_name",
            "image_name",
            "video_name",
            "comment_pick",
            "validate_bounds",
            "id_suffix",
            "name_title",
            "email_suffix",
            "number_suffix",
            "ip_suffix",
            "base_type",
            "unknown",
        ]
    );

    // A column matching several rules resolves to the earliest one.
    let column = ColumnDescriptor::new("video_image_date", "JSON");
    let classified = column.classify();
    let matching: Vec<&str> = MOCK_RULES
        .iter()
        .filter(|rule| (rule.apply)(&classified).is_some())
        .map(|rule| rule.name)
        .collect();
    assert_eq!(
        matching,
        vec!["json_sample", "date_suffix", "image_name", "video_name", "unknown"]
    );
    assert_eq!(mapped(&column).0, "json_sample");
}

#[test]
fn mapping_is_deterministic() {
    let column = ColumnDescriptor::new("status", "VARCHAR(16)").with_comment("a b/c");
    assert_eq!(map_mock(&column.classify()), map_mock(&column.classify()));
}
