pub mod bucket_lister;
