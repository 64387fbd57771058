#![allow(dead_code)]

use std::path::{Path, PathBuf};

use git_ssh_gate::config::GatewayConfig;
use git_ssh_gate::gateway::{Decision, Gateway, Handoff, Rejection, Request};
use git_ssh_gate::store::{SqliteStore, Store};
use git_ssh_gate::types::{NewRepository, PusherIdentity, User};
use tempfile::TempDir;

pub const ORIGIN: &str = "https://git.example.org";

/// A scratch repository root, hook script and seeded database.
pub struct Fixture {
    pub temp_dir: TempDir,
    pub config: GatewayConfig,
    pub store: SqliteStore,
}

impl Fixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        std::fs::create_dir_all(temp_dir.path().join("repos")).expect("create repos dir");

        let config = GatewayConfig::from_ini_str(&config_ini(temp_dir.path())).expect("parse config");
        let store = SqliteStore::new(&config.connection_string).expect("open store");
        store.initialize().expect("initialize schema");

        Self {
            temp_dir,
            config,
            store,
        }
    }

    pub fn config_ini(&self) -> String {
        config_ini(self.temp_dir.path())
    }

    pub fn write_config(&self) -> PathBuf {
        let path = self.temp_dir.path().join("config.ini");
        std::fs::write(&path, self.config_ini()).expect("write config");
        path
    }

    pub fn log_file(&self) -> PathBuf {
        self.temp_dir.path().join("shell.log")
    }

    pub fn repos(&self) -> &Path {
        &self.config.repos
    }

    pub fn repo_path(&self, owner: &str, name: &str) -> PathBuf {
        self.repos().join(format!("~{owner}")).join(name)
    }

    pub fn add_user(&self, id: i64, username: &str) {
        self.add_user_with_type(id, username, "active_paying", None);
    }

    pub fn add_suspended_user(&self, id: i64, username: &str, notice: &str) {
        self.add_user_with_type(id, username, "suspended", Some(notice));
    }

    fn add_user_with_type(&self, id: i64, username: &str, user_type: &str, notice: Option<&str>) {
        self.store
            .create_user(&User {
                id,
                username: username.to_string(),
                user_type: user_type.to_string(),
                suspension_notice: notice.map(str::to_string),
            })
            .expect("create user");
    }

    /// Inserts a repository row at `<repos>/~owner/name`.
    pub fn add_repo(&self, owner_id: i64, owner: &str, name: &str, visibility: &str) -> i64 {
        self.store
            .create_repository(&NewRepository {
                name: name.to_string(),
                owner_id,
                path: self.repo_path(owner, name).to_string_lossy().into_owned(),
                visibility: visibility.to_string(),
            })
            .expect("create repository")
    }

    /// Drops `table` behind the store's back so later queries against it fail.
    pub fn drop_table(&self, table: &str) {
        let conn = rusqlite::Connection::open(&self.config.connection_string).expect("open database");
        conn.execute_batch(&format!("DROP TABLE \"{table}\""))
            .expect("drop table");
    }

    pub fn decide(&self, pusher_id: i64, pusher_name: &str, command: &str) -> Decision {
        let request = Request {
            pusher: PusherIdentity {
                id: pusher_id,
                name: pusher_name.to_string(),
            },
            command: command.to_string(),
        };
        Gateway::new(&self.config, &self.store).decide(&request)
    }
}

fn config_ini(root: &Path) -> String {
    format!(
        "[sr.ht]\n\
         owner-name=Example Admin\n\
         owner-email=admin@example.org\n\
         \n\
         [git.sr.ht]\n\
         origin={ORIGIN}\n\
         repos={}\n\
         post-update-script={}\n\
         connection-string={}\n",
        root.join("repos").display(),
        root.join("update-hook").display(),
        root.join("srht.db").display(),
    )
}

pub fn expect_handoff(decision: Decision) -> Handoff {
    match decision {
        Decision::Handoff(handoff) => handoff,
        Decision::Reject(rejection) => panic!("expected handoff, got {rejection:?}"),
    }
}

pub fn expect_rejection(decision: Decision) -> Rejection {
    match decision {
        Decision::Reject(rejection) => rejection,
        Decision::Handoff(handoff) => panic!("expected rejection, got {handoff:?}"),
    }
}
