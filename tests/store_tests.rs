use std::path::PathBuf;
use storefront::db::{ProductInput, Store};

struct TempDb {
    path: PathBuf,
}

impl TempDb {
    fn new() -> Self {
        Self {
            path: std::env::temp_dir().join(format!("storefront-store-{}.db", uuid::Uuid::new_v4())),
        }
    }

    fn url(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

fn widget() -> ProductInput {
    ProductInput {
        name: "Widget".to_string(),
        price: 9.99,
        description: "A widget".to_string(),
    }
}

#[tokio::test]
async fn test_database_file_is_created_and_migrations_rerun() {
    let db = TempDb::new();

    let store = Store::new(&db.url()).await.unwrap();
    assert!(db.path.exists());
    store.ping().await.unwrap();
    store.create_user("alice", "hash").await.unwrap();
    drop(store);

    let store = Store::new(&db.url()).await.unwrap();
    assert_eq!(store.count_users().await.unwrap(), 1);
}

#[tokio::test]
async fn test_missing_parent_directories_are_created() {
    let root = std::env::temp_dir().join(format!("storefront-nested-{}", uuid::Uuid::new_v4()));
    let path = root.join("var").join("app-instance").join("database.db");

    let store = Store::new(&format!("sqlite:{}", path.display())).await.unwrap();
    store.ping().await.unwrap();
    assert!(path.exists());

    drop(store);
    let _ = std::fs::remove_dir_all(&root);
}

#[tokio::test]
async fn test_unusable_database_directory_reports_path() {
    let blocker = TempDb::new();
    std::fs::write(&blocker.path, b"not a directory").unwrap();
    let url = format!("sqlite:{}", blocker.path.join("database.db").display());

    let err = Store::new(&url).await.err().unwrap();
    assert!(
        format!("{err:#}").contains("Failed to create database directory"),
        "{err:#}"
    );
}

#[tokio::test]
async fn test_duplicate_username_is_rejected() {
    let db = TempDb::new();
    let store = Store::new(&db.url()).await.unwrap();

    let first = store.create_user("alice", "hash").await.unwrap();
    assert!(first.is_some());

    let second = store.create_user("alice", "other").await.unwrap();
    assert!(second.is_none());
    assert_eq!(store.count_users().await.unwrap(), 1);
}

#[tokio::test]
async fn test_password_hash_stays_out_of_user() {
    let db = TempDb::new();
    let store = Store::new(&db.url()).await.unwrap();

    let user = store.create_user("alice", "stored-hash").await.unwrap().unwrap();
    assert_eq!(store.get_user(user.id).await.unwrap(), Some(user.clone()));

    let (found, hash) = store
        .get_user_by_username_with_password("alice")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found, user);
    assert_eq!(hash, "stored-hash");

    assert!(store.get_user_by_username("bob").await.unwrap().is_none());
}

#[tokio::test]
async fn test_product_crud() {
    let db = TempDb::new();
    let store = Store::new(&db.url()).await.unwrap();

    let alice = store.create_user("alice", "h").await.unwrap().unwrap();
    let bob = store.create_user("bob", "h").await.unwrap().unwrap();

    let product = store.add_product(alice.id, &widget()).await.unwrap();
    store
        .add_product(
            bob.id,
            &ProductInput {
                name: "Gadget".to_string(),
                ..widget()
            },
        )
        .await
        .unwrap();

    assert_eq!(store.list_products().await.unwrap().len(), 2);
    let mine = store.list_products_for_owner(alice.id).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].name, "Widget");

    let edited = ProductInput {
        price: 19.99,
        ..widget()
    };
    assert!(store.update_product(product.id, &edited).await.unwrap());
    assert!(!store.update_product(9999, &edited).await.unwrap());

    let fetched = store.get_product(product.id).await.unwrap().unwrap();
    assert!((fetched.price - 19.99).abs() < f64::EPSILON);
    assert_eq!(fetched.owner, alice.id);

    assert!(store.remove_product(product.id).await.unwrap());
    assert!(!store.remove_product(product.id).await.unwrap());
    assert!(store.get_product(product.id).await.unwrap().is_none());
}
