use strum_macros::{Display, EnumString};

#[derive(EnumString, Display, Copy, Clone, Debug)]
pub(crate) enum Endpoint {
    #[strum(serialize = "/IWishlistService/GetWishlist/v1/")]
    Wishlist,
    #[strum(serialize = "/api/appdetails/")]
    AppDetails,
}
