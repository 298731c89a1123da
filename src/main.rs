use arrow_admin_lib::config::WizardConfig;
use arrow_admin_lib::data::models::attachment::ImageFile;
use arrow_admin_lib::data::models::categories::Category;
use arrow_admin_lib::data::models::draft::{ArrayField, FieldUpdate};
use arrow_admin_lib::data::repos::implementors::category_repo::CategoryRepo;
use arrow_admin_lib::data::repos::implementors::product_repo::ProductRepo;
use arrow_admin_lib::services::product_wizard::{
    Navigation, ProductWizard, SubmitOutcome, WizardDeps,
};
use arrow_admin_lib::services::wizard_steps::WizardStep;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = WizardConfig::new();
    let products = Arc::new(ProductRepo::new());
    let categories = Arc::new(CategoryRepo::new(vec![
        Category::new("cat1", "Kitchen"),
        Category::new("cat2", "Garden"),
    ]));

    let wizard = ProductWizard::create(WizardDeps::new(
        Arc::clone(&products),
        Arc::clone(&categories),
        config.clone(),
    ));
    wizard.load_categories().await?;

    wizard.update_field(FieldUpdate::Name("Mug".to_string()))?;
    wizard.update_field(FieldUpdate::CategoryId("cat1".to_string()))?;
    wizard.update_field(FieldUpdate::Description("A mug".to_string()))?;
    advance(&wizard)?;

    wizard.update_field(FieldUpdate::BasePrice("9.99".to_string()))?;
    wizard.update_field(FieldUpdate::Quantity("10".to_string()))?;
    wizard.update_array_field(ArrayField::Tags, "ceramic, kitchen")?;
    wizard.update_additional_info("material", "stoneware")?;
    advance(&wizard)?;

    let cover = ImageFile::new("mug.png", "image/png", vec![0x89, 0x50, 0x4e, 0x47]);
    wizard.select_cover_image(cover)?;
    advance(&wizard)?;

    tokio::time::sleep(config.simulated_upload_delay).await;

    let record = match wizard.submit().await? {
        SubmitOutcome::Saved(record) => record,
        other => return Err(format!("Product was not saved: {:?}", other).into()),
    };
    tracing::info!("Created {} with cover {:?}", record.id, record.cover_image);
    drop(wizard);

    let editor = ProductWizard::edit(
        WizardDeps::new(Arc::clone(&products), categories, config),
        record.id.clone(),
    );
    editor.ready().await?;
    editor.update_field(FieldUpdate::BasePrice("11.50".to_string()))?;
    editor.go_to_step(WizardStep::last())?;

    if let SubmitOutcome::Saved(updated) = editor.submit().await? {
        tracing::info!("Updated {} to price {}", updated.id, updated.base_price);
    }

    Ok(())
}

fn advance(
    wizard: &ProductWizard<ProductRepo, CategoryRepo>,
) -> Result<(), Box<dyn std::error::Error>> {
    match wizard.go_to_next_step()? {
        Navigation::Blocked(step) => {
            Err(format!("Step {} is incomplete: {:?}", step, wizard.field_errors()).into())
        }
        _ => Ok(()),
    }
}
