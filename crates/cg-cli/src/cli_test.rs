use super::*;
use clap::{CommandFactory, Parser};

#[test]
fn verify_cli_args() {
    // Catches short flag conflicts and duplicate args across the command tree
    Cli::command().debug_assert();
}

#[test]
fn test_path_requires_two_datasets() {
    assert!(Cli::try_parse_from(["cg", "path", "ctx.md", "orders"]).is_err());
    let cli = Cli::try_parse_from(["cg", "path", "ctx.md", "orders", "customers"]).unwrap();
    match cli.command {
        Commands::Path(args) => assert_eq!(args.datasets, vec!["orders", "customers"]),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_query_lists_split_on_commas() {
    let cli = Cli::try_parse_from([
        "cg",
        "query",
        "ctx.md",
        "orders",
        "customers",
        "--select",
        "c.name,total",
        "-f",
        "region:region=EU",
        "-f",
        "active_only",
        "--where",
        "o.amount > 0",
        "--limit",
        "5",
        "-v",
    ])
    .unwrap();

    assert!(cli.global.verbose);
    match cli.command {
        Commands::Query(args) => {
            assert_eq!(args.datasets, vec!["orders", "customers"]);
            assert_eq!(args.select, vec!["c.name", "total"]);
            assert_eq!(args.filter, vec!["region:region=EU", "active_only"]);
            assert_eq!(args.where_clauses, vec!["o.amount > 0"]);
            assert_eq!(args.limit, Some(5));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_fmt_check_conflicts_with_write() {
    assert!(Cli::try_parse_from(["cg", "fmt", "ctx.md", "--check", "--write"]).is_err());
}
