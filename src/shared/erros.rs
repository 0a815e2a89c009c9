// src/shared/erros.rs

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;
use tracing::error;

use super::shared_structs::GenericResponse;

/// Erros de negócio da camada de serviço da loja.
///
/// Cada variante corresponde a uma falha que a API devolve ao cliente com um
/// status HTTP apropriado. Falhas de infraestrutura (conexão, constraint)
/// ficam na variante `Banco` e nunca vazam detalhes internos na resposta.
#[derive(Debug, Error)]
pub enum ErroLoja {
    #[error("Usuário não encontrado.")]
    UsuarioNaoEncontrado,

    #[error("Produto não encontrado.")]
    ProdutoNaoEncontrado,

    #[error("Carrinho não encontrado para o usuário.")]
    CarrinhoNaoEncontrado,

    #[error("Produto não encontrado no carrinho.")]
    ItemNaoEncontrado,

    #[error("Venda não encontrada.")]
    VendaNaoEncontrada,

    #[error("A quantidade deve ser um número positivo.")]
    QuantidadeInvalida,

    #[error("Estoque insuficiente para o produto {produto}. Disponível: {disponivel}, Solicitado: {solicitado}")]
    EstoqueInsuficiente {
        produto: String,
        disponivel: i32,
        solicitado: i32,
    },

    #[error("O carrinho está vazio. Adicione itens antes de realizar a venda.")]
    CarrinhoVazio,

    #[error("A venda não está pendente e não permite esta operação.")]
    EstadoInvalido,

    #[error("Você não tem permissão para realizar esta operação.")]
    NaoAutorizado,

    #[error("Erro interno ao acessar o banco de dados.")]
    Banco(#[from] sqlx::Error),
}

/// Código SQLSTATE de violação de foreign key no PostgreSQL.
const SQLSTATE_VIOLACAO_FK: &str = "23503";

/// Indica se o erro do sqlx é uma violação de foreign key, pelo código
/// SQLSTATE (independe do idioma da mensagem do servidor).
pub fn violacao_de_fk(erro: &sqlx::Error) -> bool {
    erro.as_database_error()
        .and_then(|d| d.code())
        .map_or(false, |codigo| codigo == SQLSTATE_VIOLACAO_FK)
}

impl ResponseError for ErroLoja {
    fn status_code(&self) -> StatusCode {
        match self {
            ErroLoja::UsuarioNaoEncontrado
            | ErroLoja::ProdutoNaoEncontrado
            | ErroLoja::CarrinhoNaoEncontrado
            | ErroLoja::ItemNaoEncontrado
            | ErroLoja::VendaNaoEncontrada => StatusCode::NOT_FOUND,

            ErroLoja::QuantidadeInvalida
            | ErroLoja::EstoqueInsuficiente { .. }
            | ErroLoja::CarrinhoVazio => StatusCode::BAD_REQUEST,

            ErroLoja::EstadoInvalido => StatusCode::CONFLICT,
            ErroLoja::NaoAutorizado => StatusCode::FORBIDDEN,
            ErroLoja::Banco(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ErroLoja::Banco(e) = self {
            // O detalhe do erro de banco vai apenas para o log.
            error!(erro = ?e, "erro de banco de dados");
        }
        HttpResponse::build(self.status_code())
            .json(GenericResponse::erro(self.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estoque_insuficiente_informa_disponivel_e_solicitado() {
        let erro = ErroLoja::EstoqueInsuficiente {
            produto: "Caneca".to_string(),
            disponivel: 2,
            solicitado: 5,
        };
        let mensagem = erro.to_string();
        assert!(mensagem.contains("Caneca"));
        assert!(mensagem.contains("Disponível: 2"));
        assert!(mensagem.contains("Solicitado: 5"));
    }

    #[test]
    fn status_http_por_tipo_de_erro() {
        assert_eq!(ErroLoja::VendaNaoEncontrada.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErroLoja::CarrinhoVazio.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErroLoja::EstadoInvalido.status_code(), StatusCode::CONFLICT);
        assert_eq!(ErroLoja::NaoAutorizado.status_code(), StatusCode::FORBIDDEN);
    }
}
