use storage::{
    ResortStore,
    dto::{
        common::PaginationMeta,
        resort::{
            CountryCount, CreateResortRequest, LocationFacets, ResortCatalogResponse,
            ResortDetailResponse, ResortFilter, ResortResponse,
        },
    },
    error::Result,
    models::{Rating, Resort},
    services::resort_summary::{category_averages, top_category},
};
use uuid::Uuid;

/// One catalog page with pagination metadata and location facets
pub async fn search_resorts(store: &dyn ResortStore, filter: &ResortFilter) -> Result<ResortCatalogResponse> {
    let (resorts, total_items) = store.search_resorts(filter).await?;
    let locations = store.locations().await?;

    Ok(ResortCatalogResponse {
        data: resorts.into_iter().map(ResortResponse::from).collect(),
        pagination: PaginationMeta::new(filter.page, filter.page_size, total_items),
        facets: LocationFacets::from_locations(&locations, filter.continent()),
    })
}

pub async fn list_countries(store: &dyn ResortStore) -> Result<Vec<CountryCount>> {
    store.country_counts().await
}

/// Resort with its ratings, newest first, and the per-category breakdown
pub async fn get_resort_detail(store: &dyn ResortStore, resort_id: Uuid) -> Result<ResortDetailResponse> {
    let resort = store.find_resort(resort_id).await?;
    let ratings = store.resort_ratings(resort_id).await?;

    let plain: Vec<Rating> = ratings.iter().map(|r| r.rating.clone()).collect();
    let averages = category_averages(&plain);
    let top = top_category(&averages, plain.len()).cloned();

    Ok(ResortDetailResponse {
        resort: ResortResponse::from(resort),
        ratings,
        category_averages: averages,
        top_category: top,
    })
}

pub async fn create_resort(store: &dyn ResortStore, req: &CreateResortRequest) -> Result<Resort> {
    let resort = store.create_resort(req).await?;

    tracing::info!(resort_id = %resort.resort_id, name = %resort.name, "Created resort");

    Ok(resort)
}
