use anyhow::Result;
use perfume_shop::catalog_model::{NewProduct, NewShopUser, ProductType};
use perfume_shop::db::{ProductRepository, SqliteRepository, UserRepository};

/// File-backed database in a fresh temporary directory
async fn setup_test_db() -> Result<(tempfile::TempDir, SqliteRepository)> {
    let dir = tempfile::tempdir()?;
    let url = format!("sqlite://{}", dir.path().join("data").join("shop.db").display());
    let repository = SqliteRepository::connect(&url).await?;
    Ok((dir, repository))
}

fn sample_product(name: &str, price: f64) -> NewProduct {
    NewProduct {
        product_type: ProductType::Unisex,
        name: name.to_string(),
        description: "Bergamot, amber".to_string(),
        price,
        image_id: format!("{name}-file"),
    }
}

#[tokio::test]
async fn test_connect_creates_database_file() -> Result<()> {
    let (dir, _repository) = setup_test_db().await?;
    assert!(dir.path().join("data").join("shop.db").exists());
    Ok(())
}

#[tokio::test]
async fn test_products_survive_reconnect() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let url = format!("sqlite://{}", dir.path().join("shop.db").display());

    let first_id = {
        let repository = SqliteRepository::connect(&url).await?;
        let id = repository.create_product(&sample_product("Ambre", 89.9)).await?;
        repository.pool().close().await;
        id
    };

    let repository = SqliteRepository::connect(&url).await?;
    let second_id = repository.create_product(&sample_product("Cuir", 120.0)).await?;
    assert!(second_id > first_id);

    let products = repository.list_products().await?;
    let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Ambre", "Cuir"]);
    assert_eq!(products[0].id, first_id);
    assert_eq!(products[0].price, 89.9);
    assert_eq!(products[0].product_type, ProductType::Unisex);
    Ok(())
}

#[tokio::test]
async fn test_get_or_create_user_keeps_first_profile() -> Result<()> {
    let (_dir, repository) = setup_test_db().await?;

    let first = repository
        .get_or_create_user(&NewShopUser {
            chat_id: 555,
            username: Some("first".to_string()),
            first_name: Some("Sam".to_string()),
            language_code: Some("en".to_string()),
        })
        .await?;

    let again = repository
        .get_or_create_user(&NewShopUser {
            chat_id: 555,
            username: Some("renamed".to_string()),
            ..Default::default()
        })
        .await?;

    assert_eq!(again.id, first.id);
    assert_eq!(again.username.as_deref(), Some("first"));
    assert_eq!(again.first_name.as_deref(), Some("Sam"));
    Ok(())
}

#[tokio::test]
async fn test_get_user_by_chat_id() -> Result<()> {
    let (_dir, repository) = setup_test_db().await?;

    assert!(repository.get_user_by_chat_id(1).await?.is_none());

    repository
        .get_or_create_user(&NewShopUser {
            chat_id: 1,
            ..Default::default()
        })
        .await?;

    let user = repository.get_user_by_chat_id(1).await?;
    let user = user.expect("user should exist");
    assert_eq!(user.chat_id, 1);
    assert!(user.username.is_none());
    assert!(repository.get_user_by_chat_id(2).await?.is_none());
    Ok(())
}
