pub mod handlers;
pub mod structures;

pub use handlers::{
    __path_get_like_count, __path_get_like_status, __path_get_recipe, __path_search_recipes,
    __path_sync_recipes, __path_toggle_like, get_like_count, get_like_status, get_recipe,
    init_routes, search_recipes, sync_recipes, to_search_query, toggle_like,
};

pub use structures::{PageParams, RecipeSearchParams, SYNC_SUCCESS_MESSAGE};
