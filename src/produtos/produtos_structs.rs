// src/produtos/produtos_structs.rs

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Estrutura para receber dados do novo produto na requisição POST/PUT
#[derive(Deserialize)]
pub struct NovoProduto {
    pub nome: String,
    pub descricao: String,
    pub preco: BigDecimal,
    pub estoque: i32,
    pub categoria_id: Option<i32>,
    pub imagem_url: Option<String>,
    #[serde(default)]
    pub destaque: bool,
}

/// Estrutura que representa um produto no banco de dados.
/// Deriva FromRow para mapeamento direto de resultados de query SQL.
/// O estoque só é decrementado/incrementado pelo motor de vendas; as rotas
/// de catálogo o alteram apenas em atualizações administrativas.
#[derive(Serialize, FromRow)]
pub struct Produto {
    pub id: i32,
    pub nome: String,
    pub descricao: String,
    pub preco: BigDecimal,
    pub estoque: i32,
    pub categoria_id: Option<i32>,
    pub imagem_url: Option<String>,
    pub destaque: bool,
}

/// Filtro opcional para a listagem de produtos.
#[derive(Deserialize)]
pub struct FiltroProdutos {
    pub categoria_id: Option<i32>,
    pub destaque: Option<bool>,
}
